//! iframe-proxy
//!
//! ```text
//!   browser (iframe)                                      origin
//!        │  GET /proxy?url=...                              ▲
//!        ▼                                                  │
//!   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┴┐
//!   │   http   │──▶│ request  │──▶│  fetch   │──▶│  reqwest  │
//!   │  server  │   │  (url=)  │   │ (retry)  │   │  client   │
//!   └──────────┘   └──────────┘   └────┬─────┘   └───────────┘
//!        ▲                             │ FetchResult
//!        │         ┌──────────┐   ┌────▼─────┐
//!        └─────────│ response │◀──│ rewrite  │
//!                  │ envelope │   │ passes   │
//!                  └──────────┘   └──────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use iframe_proxy::config::{self, loader::apply_env_overrides, ProxyConfig};
use iframe_proxy::lifecycle::{signals, Shutdown};
use iframe_proxy::observability::{logging, metrics};
use iframe_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "iframe-proxy")]
#[command(about = "Rewriting HTTP proxy for embedding third-party pages in an iframe", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "IFRAME_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overriding the config file and environment.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ProxyConfig::default(),
    };
    let env_override = apply_env_overrides(&mut config);
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Err(errors) = config::validate_config(&config) {
        return Err(config::ConfigError::Validation(errors).into());
    }

    logging::init_logging(&config.observability);

    tracing::info!("iframe-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(var) = env_override {
        tracing::info!(var, "Bind address overridden from environment");
    }
    tracing::info!(
        bind_address = %config.listener.bind_address,
        fetch_timeout_secs = config.fetch.timeout_secs,
        max_redirects = config.fetch.max_redirects,
        retries_enabled = config.retries.enabled,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
