use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use promgate_core::error::{PromGateError, Result};
use promgate_core::SummaryWindow;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PromGateError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1024..=16 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(PromGateError::BadRequest(
                "gateway.max_body_bytes must be between 1024 and 16777216".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            PromGateError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_max_body_bytes() -> usize {
    64 * 1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Help text for metrics created without one.
    #[serde(default = "default_help")]
    pub default_help: String,

    #[serde(default)]
    pub summary: SummarySection,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            default_help: default_help(),
            summary: SummarySection::default(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.default_help.trim().is_empty() {
            return Err(PromGateError::BadRequest(
                "metrics.default_help must not be empty".into(),
            ));
        }
        self.summary.validate()
    }
}

fn default_help() -> String {
    "Help empty".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummarySection {
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    /// 0 disables age pruning.
    #[serde(default)]
    pub max_age_secs: u64,
}

impl Default for SummarySection {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            max_age_secs: 0,
        }
    }
}

impl SummarySection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1_000_000).contains(&self.max_samples) {
            return Err(PromGateError::BadRequest(
                "metrics.summary.max_samples must be between 1 and 1000000".into(),
            ));
        }
        if self.max_age_secs > 86_400 {
            return Err(PromGateError::BadRequest(
                "metrics.summary.max_age_secs must be at most 86400".into(),
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> SummaryWindow {
        SummaryWindow {
            max_samples: self.max_samples,
            max_age: (self.max_age_secs > 0).then(|| Duration::from_secs(self.max_age_secs)),
        }
    }
}

fn default_max_samples() -> usize {
    1024
}
