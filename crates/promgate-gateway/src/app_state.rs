//! Shared application state for the promgate gateway.
//!
//! Owns the metric registry. Handlers receive it through axum's `State`
//! extractor; nothing in the process reaches it through a global.

use std::sync::Arc;

use promgate_core::Registry;

use crate::config::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    registry: Registry,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        let registry = Registry::new(cfg.metrics.summary.window());
        Self {
            inner: Arc::new(AppStateInner { cfg, registry }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Help text for a request, falling back to `metrics.default_help`.
    pub fn help_or_default<'a>(&'a self, help: Option<&'a str>) -> &'a str {
        help.filter(|h| !h.is_empty())
            .unwrap_or(self.inner.cfg.metrics.default_help.as_str())
    }
}
