//! Outbound fetch subsystem.
//!
//! # Data Flow
//! ```text
//! raw `url` query value
//!     → target.rs (parse, require absolute http/https)
//!     → client.rs (GET with browser User-Agent, deadline, size cap, retries)
//!     → FetchResult (status, headers, bytes, content type, final URL)
//!     → handed to the rewriter, dropped when the response is sent
//! ```
//!
//! # Design Decisions
//! - Bodies are opaque bytes here; only the rewriter decides whether to decode
//! - Any origin status is a successful fetch; only transport failures error
//! - Redirects are followed by the client (configurable limit) and the final
//!   URL becomes the base for resolving relative references
//! - No cookies or credentials are forwarded to origins

pub mod client;
pub mod target;

pub use client::{FetchResult, Fetcher};
pub use target::TargetUrl;
