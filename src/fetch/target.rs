//! Validated target URL.

use std::fmt;

use url::Url;

use crate::error::ProxyError;

/// An absolute http(s) URL the proxy has been asked to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(Url);

impl TargetUrl {
    /// Parse `input` as an absolute URL with scheme http or https.
    pub fn parse(input: &str) -> Result<Self, ProxyError> {
        let url = Url::parse(input.trim()).map_err(|e| ProxyError::InvalidUrl {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(ProxyError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
