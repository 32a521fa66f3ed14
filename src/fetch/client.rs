//! HTTP client used to fetch origin resources.

use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap, StatusCode};
use bytes::{Bytes, BytesMut};
use reqwest::redirect;
use url::Url;

use crate::config::{FetchConfig, LimitsConfig, RetryConfig};
use crate::error::FetchError;
use crate::fetch::target::TargetUrl;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;

/// What the origin answered. Owned by exactly one request.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Origin `Content-Type`, empty when absent.
    pub content_type: String,
    /// URL of the final response after redirects.
    pub final_url: Url,
}

/// Fetches origin resources while impersonating a desktop browser.
///
/// Holds a pooled `reqwest::Client`; no per-request state survives a fetch.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
    timeout_secs: u64,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(
        fetch: &FetchConfig,
        retries: &RetryConfig,
        limits: &LimitsConfig,
    ) -> Result<Self, FetchError> {
        let redirect_policy = if fetch.max_redirects == 0 {
            redirect::Policy::none()
        } else {
            redirect::Policy::limited(fetch.max_redirects)
        };

        let mut builder = reqwest::Client::builder()
            .user_agent(fetch.user_agent.clone())
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .connect_timeout(Duration::from_secs(fetch.connect_timeout_secs))
            .redirect(redirect_policy);
        if !fetch.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            retry: RetryPolicy::from_config(retries),
            timeout_secs: fetch.timeout_secs,
            max_body_bytes: limits.max_body_bytes,
        })
    }

    /// GET `target`, retrying transient network failures per the retry policy.
    pub async fn fetch(&self, target: &TargetUrl) -> Result<FetchResult, FetchError> {
        let start = Instant::now();
        let mut attempt = 0;

        let result = loop {
            attempt += 1;
            match self.fetch_once(target).await {
                Ok(result) => break Ok(result),
                Err(e) => match self.retry.next_delay(attempt, &e) {
                    Some(delay) => {
                        tracing::info!(target_url = %target, attempt, delay = ?delay, error = %e, "Retrying fetch");
                        tokio::time::sleep(delay).await;
                    }
                    None => break Err(e),
                },
            }
        };

        metrics::record_fetch(start);
        result
    }

    async fn fetch_once(&self, target: &TargetUrl) -> Result<FetchResult, FetchError> {
        let mut response = self
            .client
            .get(target.as_url().clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_secs))?;

        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes as u64 {
                return Err(FetchError::BodyTooLarge { limit: self.max_body_bytes });
            }
        }

        let status = response.status();
        let final_url = response.url().clone();
        let headers = std::mem::take(response.headers_mut());
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_secs))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(FetchError::BodyTooLarge { limit: self.max_body_bytes });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(
            target_url = %target,
            final_url = %final_url,
            status = status.as_u16(),
            content_type = %content_type,
            bytes = body.len(),
            "Origin responded"
        );

        Ok(FetchResult {
            status,
            headers,
            body: body.freeze(),
            content_type,
            final_url,
        })
    }
}
