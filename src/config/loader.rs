//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override the bind address. The first one set wins.
const BIND_ENV_VARS: [&str; 2] = ["IFRAME_PROXY_BIND", "PORT"];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProxyConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply bind-address overrides from the environment.
///
/// `IFRAME_PROXY_BIND` holds a full socket address; `PORT` only a port,
/// bound on all interfaces. Returns the variable that was applied.
pub fn apply_env_overrides(config: &mut ProxyConfig) -> Option<&'static str> {
    for var in BIND_ENV_VARS {
        let Ok(value) = std::env::var(var) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        config.listener.bind_address = if var == "PORT" {
            format!("0.0.0.0:{}", value)
        } else {
            value.to_string()
        };
        return Some(var);
    }
    None
}
