//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, routes)
//!     → request.rs (request ID, `url` query extraction)
//!     → fetch (origin GET)
//!     → rewrite (headers + body)
//!     → response.rs (ResponseEnvelope → client)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, ProxyQuery, X_REQUEST_ID};
pub use response::{cors_headers, sanitize_headers, ResponseEnvelope};
pub use server::{AppState, HttpServer};
