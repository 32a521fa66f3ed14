//! Response assembly and header sanitization.
//!
//! # Responsibilities
//! - Strip headers that block iframe embedding or cross-origin loading
//! - Strip hop-by-hop headers and those invalidated by rewriting
//! - Add permissive CORS headers
//! - Route `Location` back through the proxy
//!
//! # Design Decisions
//! - Origin `Content-Type` is passed through verbatim, even for rewritten bodies
//! - `Content-Length` is dropped and recomputed from the final body
//! - Cookies are never forwarded

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use url::Url;

use crate::rewrite::{resolve_and_wrap, ContentKind};

/// Headers removed from every origin response.
static STRIPPED_HEADERS: [HeaderName; 14] = [
    header::X_FRAME_OPTIONS,
    header::CONTENT_SECURITY_POLICY,
    header::CONTENT_SECURITY_POLICY_REPORT_ONLY,
    header::X_CONTENT_TYPE_OPTIONS,
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::TE,
    header::TRAILER,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::CONTENT_LENGTH,
    header::SET_COOKIE,
];

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Final response for one proxied request.
#[derive(Debug)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub kind: ContentKind,
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// `Access-Control-Allow-*` headers set on every proxy response.
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(2);
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers
}

/// Build the client-facing header set from the origin's.
pub fn sanitize_headers(origin: &HeaderMap, base: &Url) -> HeaderMap {
    let mut headers = origin.clone();
    for name in &STRIPPED_HEADERS {
        headers.remove(name);
    }

    if let Some(location) = headers.remove(header::LOCATION) {
        let rewritten = location
            .to_str()
            .ok()
            .map(|value| resolve_and_wrap(value, base))
            .and_then(|value| HeaderValue::from_str(&value).ok());
        headers.insert(header::LOCATION, rewritten.unwrap_or(location));
    }

    headers.extend(cors_headers());
    headers
}
