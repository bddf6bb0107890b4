use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{PromGateError, Result};
use crate::exposition;
use crate::instrument::{Metric, MetricKind, SummaryWindow};

/// Metric registry:
/// - `name -> Metric`
/// - creation sequence kept per metric so exposition follows registration order
///
/// Construct once at startup and share; there is no global instance.
pub struct Registry {
    metrics: DashMap<String, Arc<Metric>>,
    seq: AtomicU64,
    summary_window: SummaryWindow,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(SummaryWindow::default())
    }
}

impl Registry {
    pub fn new(summary_window: SummaryWindow) -> Self {
        Self {
            metrics: DashMap::new(),
            seq: AtomicU64::new(1),
            summary_window,
        }
    }

    /// Return the metric registered under `name`, creating it if absent.
    ///
    /// An existing metric is returned as-is: `kind`, `help` and `label_names`
    /// only matter on the call that creates it.
    pub fn get_or_create(
        &self,
        name: &str,
        kind: MetricKind,
        help: &str,
        label_names: &[String],
    ) -> Result<Arc<Metric>> {
        if let Some(existing) = self.metrics.get(name) {
            let m = Arc::clone(existing.value());
            drop(existing);
            if m.kind() != kind {
                tracing::debug!(metric = %name, registered = %m.kind(), requested = %kind, "kind mismatch, using registered metric");
            }
            return Ok(m);
        }

        validate_metric_name(name)?;

        let entry = self.metrics.entry(name.to_string()).or_insert_with(|| {
            let created_seq = self.seq.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(metric = %name, %kind, labels = ?label_names, "metric registered");
            Arc::new(Metric::new(
                name.to_string(),
                kind,
                help.to_string(),
                label_names.to_vec(),
                created_seq,
                self.summary_window,
            ))
        });
        Ok(Arc::clone(entry.value()))
    }

    pub fn get(&self, name: &str) -> Option<Arc<Metric>> {
        self.metrics.get(name).map(|r| Arc::clone(r.value()))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Drop every metric. Test isolation only.
    pub fn clear(&self) {
        self.metrics.clear();
    }

    /// Metrics in registration order.
    pub fn metrics(&self) -> Vec<Arc<Metric>> {
        let mut out: Vec<Arc<Metric>> = self.metrics.iter().map(|r| Arc::clone(r.value())).collect();
        out.sort_by_key(|m| m.created_seq());
        out
    }

    /// Prometheus text exposition of the current state.
    pub fn render(&self) -> String {
        exposition::render(self)
    }
}

/// Prometheus metric name grammar: `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn validate_metric_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(PromGateError::BadRequest("metric name must not be empty".into()));
    };
    let head_ok = first.is_ascii_alphabetic() || first == '_' || first == ':';
    if !head_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':') {
        return Err(PromGateError::BadRequest(format!("invalid metric name: {name}")));
    }
    Ok(())
}
