//! Error taxonomy for the proxy pipeline.
//!
//! Client input problems surface as 400, origin failures as 500. Per-reference
//! rewrite failures never reach this type; the rewriter absorbs them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::cors_headers;

/// Body returned when the `url` query parameter is absent.
pub const MISSING_URL_MESSAGE: &str = "URL is required. Usage: /proxy?url=https://example.com";

/// Network-level failure reaching the origin.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The whole fetch exceeded its deadline.
    #[error("request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    /// DNS, TCP or TLS failure before a response arrived.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport failure (protocol error, redirect loop, broken body).
    #[error("{0}")]
    Request(String),

    /// Origin body larger than the configured limit.
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Connect(_))
    }

    /// Classify a `reqwest` error, keeping the full cause chain in the message.
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout { secs: timeout_secs };
        }
        let message = error_chain(&err);
        if err.is_connect() {
            FetchError::Connect(message)
        } else {
            FetchError::Request(message)
        }
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Failure of one proxy request, converted to a response at the top of the handler.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{}", MISSING_URL_MESSAGE)]
    MissingUrl,

    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Unsupported URL scheme '{0}': only http and https can be proxied")]
    UnsupportedScheme(String),

    #[error("Error loading page: {0}")]
    Fetch(#[from] FetchError),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingUrl
            | ProxyError::InvalidUrl { .. }
            | ProxyError::UnsupportedScheme(_) => StatusCode::BAD_REQUEST,
            ProxyError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, cors_headers(), self.to_string()).into_response()
    }
}
