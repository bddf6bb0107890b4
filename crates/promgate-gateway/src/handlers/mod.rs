//! Metric write endpoints.
//!
//! - `query`: `GET /{counter,gauge,histogram,summary}` with query-string params
//! - `body` : `POST` to the same paths with a JSON body and arbitrary labels
//!
//! Both families validate everything first and only then touch the registry,
//! so a rejected request never registers or mutates a metric.

pub mod body;
pub mod query;

use promgate_core::{LabelSet, MetricKind};

use crate::app_state::AppState;
use crate::error::ApiResult;

/// Get-or-create `name` and route `value` into it.
pub(crate) fn record(
    app: &AppState,
    kind: MetricKind,
    name: &str,
    help: Option<&str>,
    labels: &LabelSet,
    value: Option<f64>,
) -> ApiResult<()> {
    // An existing metric keeps its own kind, so validate against that.
    let effective = app.registry().get(name).map_or(kind, |m| m.kind());
    if let Some(v) = value {
        effective.check_value(v)?;
    }
    effective.check_labels(labels)?;

    let metric = app
        .registry()
        .get_or_create(name, kind, app.help_or_default(help), &labels.names())?;
    metric.apply(labels, value)?;
    Ok(())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
