//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Run the fetch → rewrite pipeline per request
//! - Convert every failure into a response; a single request never takes the process down

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::{FetchError, ProxyError};
use crate::fetch::Fetcher;
use crate::http::request::{request_id, MakeRequestUuid, ProxyQuery};
use crate::http::response::{cors_headers, ResponseEnvelope};
use crate::observability::metrics;
use crate::rewrite::{self, ContentKind};

/// Application state injected into handlers. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<Fetcher>,
}

/// HTTP server for the rewriting proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, FetchError> {
        let fetcher = Fetcher::new(&config.fetch, &config.retries, &config.limits)?;
        let state = AppState {
            fetcher: Arc::new(fetcher),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/proxy", get(proxy_handler).options(preflight_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id(request.headers()),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured router, for serving on a custom listener or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// `GET /proxy?url=...`
async fn proxy_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    query: Result<Query<ProxyQuery>, QueryRejection>,
) -> Response {
    let start = Instant::now();
    let id = request_id(&headers);

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            let e = ProxyError::InvalidUrl {
                input: uri.query().unwrap_or_default().to_string(),
                reason: rejection.body_text(),
            };
            return error_response(id, None, e);
        }
    };

    match proxy(&state, &query).await {
        Ok(envelope) => {
            tracing::info!(
                request_id = %id,
                target_url = query.url.as_deref().unwrap_or_default(),
                status = envelope.status.as_u16(),
                kind = envelope.kind.as_str(),
                bytes = envelope.body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Proxied"
            );
            metrics::record_request(envelope.status.as_u16(), envelope.kind.as_str());
            if envelope.kind == ContentKind::Text {
                metrics::record_rewritten(envelope.body.len());
            }
            envelope.into_response()
        }
        Err(e) => error_response(id, query.url.as_deref(), e),
    }
}

fn error_response(id: &str, target: Option<&str>, e: ProxyError) -> Response {
    let status = e.status_code();
    if status.is_server_error() {
        tracing::error!(request_id = %id, target_url = target.unwrap_or_default(), error = %e, "Proxy error");
    } else {
        tracing::warn!(request_id = %id, error = %e, "Rejected proxy request");
    }
    metrics::record_request(status.as_u16(), "error");
    e.into_response()
}

async fn proxy(state: &AppState, query: &ProxyQuery) -> Result<ResponseEnvelope, ProxyError> {
    let target = query.target()?;
    let result = state.fetcher.fetch(&target).await?;
    if result.final_url != *target.as_url() {
        tracing::debug!(target_url = %target, final_url = %result.final_url, "Redirect followed, rewriting against final URL");
    }
    Ok(rewrite::process(result))
}

/// `OPTIONS /proxy`: CORS preflight.
async fn preflight_handler() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, cors_headers())
}
