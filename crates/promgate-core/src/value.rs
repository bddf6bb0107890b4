//! Numeric input parsing.
//!
//! Every value must be finite before it reaches an accumulator.

use serde_json::Value;

use crate::error::{PromGateError, Result};

/// Parse a query-string value.
pub fn parse_value(raw: &str) -> Result<f64> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PromGateError::BadRequest(format!("\"value\" is not a number: {raw}")))?;
    finite(v)
}

/// Read an optional JSON `value` field. `null` is the same as absent.
/// Numeric strings are accepted alongside JSON numbers.
pub fn parse_json_value(raw: Option<&Value>) -> Result<Option<f64>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            let v = n.as_f64().ok_or_else(|| {
                PromGateError::BadRequest(format!("\"value\" is out of range: {n}"))
            })?;
            finite(v).map(Some)
        }
        Some(Value::String(s)) => parse_value(s).map(Some),
        Some(other) => Err(PromGateError::BadRequest(format!(
            "\"value\" must be a number, got {other}"
        ))),
    }
}

fn finite(v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PromGateError::BadRequest(format!("\"value\" must be finite, got {v}")))
    }
}
