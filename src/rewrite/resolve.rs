//! Reference resolution against the page URL.

use thiserror::Error;
use url::Url;

/// Path and query prefix of every rewritten reference.
pub const PROXY_PREFIX: &str = "/proxy?url=";

/// Why a reference is left as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unresolvable {
    #[error("unparsable reference: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("scheme '{0}' is not proxied")]
    Scheme(String),

    #[error("reference already routed through the proxy")]
    AlreadyProxied,
}

/// Resolve `reference` against `base` into an absolute http(s) URL.
pub fn resolve(reference: &str, base: &Url) -> Result<Url, Unresolvable> {
    if reference.trim_start().starts_with(PROXY_PREFIX) {
        return Err(Unresolvable::AlreadyProxied);
    }
    let url = base.join(reference)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Unresolvable::Scheme(other.to_string())),
    }
}

/// Proxy path for an absolute URL.
pub fn wrap(url: &Url) -> String {
    format!("{}{}", PROXY_PREFIX, urlencoding::encode(url.as_str()))
}

/// Route `reference` through the proxy, or return it untouched if it can't be resolved.
///
/// Never fails: one bad reference must not stop the rest of the document
/// from being rewritten.
pub fn resolve_and_wrap(reference: &str, base: &Url) -> String {
    match resolve(reference, base) {
        Ok(url) => wrap(&url),
        Err(reason) => {
            tracing::trace!(reference, %reason, "Reference left unchanged");
            reference.to_string()
        }
    }
}
