//! JSON-body writes: `{ "name", "help"?, "labels"?, "value"? }`.
//!
//! The body is parsed by hand rather than through `Json<T>` so that every
//! malformed input, including a missing content type or a non-object body,
//! ends up as the same plain-text 400.

use axum::extract::State;
use bytes::Bytes;
use serde_json::{Map, Value};

use promgate_core::labels::parse_label_set;
use promgate_core::value::parse_json_value;
use promgate_core::{LabelSet, MetricKind};

use super::record;
use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};

/// Validated POST payload.
#[derive(Debug)]
pub struct MetricWrite {
    pub name: String,
    pub help: Option<String>,
    pub labels: LabelSet,
    pub value: Option<f64>,
}

impl MetricWrite {
    pub fn parse(body: &[u8]) -> ApiResult<Self> {
        let obj = parse_object(body)?;

        let name = match obj.get("name") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) => return Err(ApiError::bad_request(r#""name" must not be empty."#)),
            None | Some(Value::Null) => return Err(ApiError::bad_request(r#"No "name" passed."#)),
            Some(_) => return Err(ApiError::bad_request(r#""name" must be a string."#)),
        };

        let help = match obj.get("help") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(ApiError::bad_request(r#""help" must be a string."#)),
        };

        let labels = match obj.get("labels") {
            None | Some(Value::Null) => LabelSet::empty(),
            Some(raw) => parse_label_set(raw)?,
        };

        let value = parse_json_value(obj.get("value"))?;

        Ok(Self { name, help, labels, value })
    }
}

fn parse_object(body: &[u8]) -> ApiResult<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(m)) => Ok(m),
        Ok(_) => Err(ApiError::bad_request("Body must be a JSON object.")),
        Err(e) => Err(ApiError::bad_request(format!("Invalid JSON body: {e}"))),
    }
}

fn write(app: &AppState, kind: MetricKind, body: &[u8]) -> ApiResult<&'static str> {
    let w = MetricWrite::parse(body)?;
    record(app, kind, &w.name, w.help.as_deref(), &w.labels, w.value)?;
    Ok("OK")
}

pub async fn counter(State(app): State<AppState>, body: Bytes) -> ApiResult<&'static str> {
    write(&app, MetricKind::Counter, &body)
}

pub async fn gauge(State(app): State<AppState>, body: Bytes) -> ApiResult<&'static str> {
    write(&app, MetricKind::Gauge, &body)
}

pub async fn histogram(State(app): State<AppState>, body: Bytes) -> ApiResult<&'static str> {
    write(&app, MetricKind::Histogram, &body)
}

pub async fn summary(State(app): State<AppState>, body: Bytes) -> ApiResult<&'static str> {
    write(&app, MetricKind::Summary, &body)
}
