//! Content rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! FetchResult
//!     → http/response.rs (sanitize headers, rewrite Location)
//!     → classify Content-Type: text-like or binary
//!     → binary: bytes untouched
//!     → text: lossy UTF-8 decode
//!         → html.rs   (href= / src= / action=)
//!         → css.rs    (url(...))
//!         → srcset.rs (srcset=)
//!     → ResponseEnvelope
//! ```
//!
//! # Design Decisions
//! - Each pass is a linear byte scanner over the decoded text rather than
//!   a regex engine; patterns are ASCII so slicing stays on char boundaries
//! - Passes are independent and run in a fixed order, each over the
//!   previous pass's output
//! - Reference resolution is fail-open: a reference that can't be routed
//!   through the proxy is copied through verbatim
//! - Rewriting is pure and synchronous; the only await in a request is the fetch

pub mod css;
pub mod html;
pub mod resolve;
pub mod srcset;

use std::borrow::Cow;

use axum::http::header;
use bytes::Bytes;
use url::Url;

use crate::fetch::FetchResult;
use crate::http::response::{sanitize_headers, ResponseEnvelope};

pub use resolve::{resolve_and_wrap, PROXY_PREFIX};

/// Content-Type substrings that mark a body as text worth rewriting.
const TEXT_MARKERS: [&str; 4] = ["text", "javascript", "json", "xml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

impl ContentKind {
    /// Case-sensitive substring match against [`TEXT_MARKERS`].
    pub fn classify(content_type: &str) -> Self {
        if TEXT_MARKERS.iter().any(|marker| content_type.contains(marker)) {
            ContentKind::Text
        } else {
            ContentKind::Binary
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Binary => "binary",
        }
    }
}

/// Run the three reference passes over `text`.
pub fn rewrite_text(text: &str, base: &Url) -> String {
    let text = html::rewrite_attributes(text, base);
    let text = css::rewrite_css_urls(&text, base);
    srcset::rewrite_srcset(&text, base)
}

fn decode<'a>(body: &'a [u8], base: &Url) -> Cow<'a, str> {
    let text = String::from_utf8_lossy(body);
    if let Cow::Owned(_) = text {
        tracing::warn!(target_url = %base, bytes = body.len(), "DecodeWarning: body is not valid UTF-8, invalid sequences replaced");
    }
    text
}

/// Turn an origin response into the response sent to the client.
///
/// References resolve against `result.final_url`, which is the target URL
/// unless the fetch followed redirects.
pub fn process(result: FetchResult) -> ResponseEnvelope {
    let FetchResult {
        status,
        headers,
        body,
        content_type,
        final_url,
    } = result;

    // Compressed bytes can't be rewritten as text
    let encoded = headers
        .get(header::CONTENT_ENCODING)
        .is_some_and(|v| !v.as_bytes().eq_ignore_ascii_case(b"identity"));
    let kind = if encoded {
        ContentKind::Binary
    } else {
        ContentKind::classify(&content_type)
    };
    let headers = sanitize_headers(&headers, &final_url);
    let body = match kind {
        ContentKind::Binary => body,
        ContentKind::Text => Bytes::from(rewrite_text(&decode(&body, &final_url), &final_url)),
    };

    ResponseEnvelope {
        status,
        headers,
        body,
        kind,
    }
}
