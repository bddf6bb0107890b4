use axum::extract::{Query, State};
use serde::Deserialize;

use promgate_core::value::parse_value;
use promgate_core::{LabelSet, MetricKind};

use super::{non_empty, record};
use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};

/// Query params shared by the GET family. Empty strings count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct MetricQuery {
    pub metric_name: Option<String>,
    pub help: Option<String>,
    pub severity: Option<String>,
    pub value: Option<String>,
}

const MISSING_NAME: &str = r#"No "metric_name" passed."#;
const MISSING_NAME_OR_VALUE: &str = r#"Both "metric_name" and "value" are required."#;

/// `GET /counter`: +1 on the `severity` series (`"0"` when not given).
pub async fn counter(
    State(app): State<AppState>,
    Query(q): Query<MetricQuery>,
) -> ApiResult<&'static str> {
    let name = non_empty(q.metric_name.as_deref()).ok_or_else(|| ApiError::bad_request(MISSING_NAME))?;
    let severity = non_empty(q.severity.as_deref()).unwrap_or("0");

    let labels = LabelSet::single("severity", severity);
    record(&app, MetricKind::Counter, name, q.help.as_deref(), &labels, None)?;
    Ok("OK")
}

pub async fn gauge(State(app): State<AppState>, Query(q): Query<MetricQuery>) -> ApiResult<&'static str> {
    valued(&app, MetricKind::Gauge, &q)
}

pub async fn histogram(State(app): State<AppState>, Query(q): Query<MetricQuery>) -> ApiResult<&'static str> {
    valued(&app, MetricKind::Histogram, &q)
}

pub async fn summary(State(app): State<AppState>, Query(q): Query<MetricQuery>) -> ApiResult<&'static str> {
    valued(&app, MetricKind::Summary, &q)
}

/// Unlabelled write that requires both `metric_name` and a numeric `value`.
fn valued(app: &AppState, kind: MetricKind, q: &MetricQuery) -> ApiResult<&'static str> {
    let (Some(name), Some(raw)) = (non_empty(q.metric_name.as_deref()), non_empty(q.value.as_deref())) else {
        return Err(ApiError::bad_request(MISSING_NAME_OR_VALUE));
    };
    let value = parse_value(raw)?;

    record(app, kind, name, q.help.as_deref(), &LabelSet::empty(), Some(value))?;
    Ok("OK")
}
