//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use promgate_core::error::{PromGateError, Result};

pub use schema::{GatewayConfig, GatewaySection, MetricsSection, SummarySection};

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "PROMGATE_CONFIG";
/// File picked up from the working directory when present.
pub const DEFAULT_CONFIG_PATH: &str = "promgate.yaml";

/// Resolve config: `$PROMGATE_CONFIG` (must exist), else `promgate.yaml` if
/// present, else built-in defaults.
pub fn load() -> Result<GatewayConfig> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        tracing::info!(%path, "loading config from {CONFIG_ENV}");
        return load_from_file(&path);
    }
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        tracing::info!(path = DEFAULT_CONFIG_PATH, "loading config");
        return load_from_file(DEFAULT_CONFIG_PATH);
    }
    tracing::info!("no config file found, using defaults");
    Ok(GatewayConfig::default())
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PromGateError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| PromGateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
