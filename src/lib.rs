//! Content-rewriting HTTP forward proxy for iframe embedding.
//!
//! `GET /proxy?url=<target>` fetches the target, strips headers that block
//! framing, and rewrites embedded references so the browser's follow-up
//! requests come back through the proxy.

// Core subsystems
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod rewrite;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::ProxyConfig;
pub use error::{FetchError, ProxyError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
