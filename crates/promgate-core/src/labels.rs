//! Label-set validation.
//!
//! Request bodies carry labels as `[{"name": "...", "value": "..."}, ...]`.
//! A set is valid only when it is an array and every element has a non-empty
//! string `name` and a non-empty string `value`. Names must also follow the
//! Prometheus label grammar and appear once per set. One bad element rejects
//! the whole set.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{PromGateError, Result};

/// One `(name, value)` label pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Series key: label pairs sorted by name so ordering in the request does not matter.
pub type LabelKey = Vec<(String, String)>;

/// Ordered label pairs as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(Vec<Label>);

impl LabelSet {
    pub fn new(labels: Vec<Label>) -> Self {
        Self(labels)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Single-label set.
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self(vec![Label::new(name, value)])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.0.iter()
    }

    /// Label names in caller order; this becomes the schema of a new metric.
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|l| l.name.clone()).collect()
    }

    pub fn key(&self) -> LabelKey {
        let mut key: LabelKey = self
            .0
            .iter()
            .map(|l| (l.name.clone(), l.value.clone()))
            .collect();
        key.sort();
        key
    }
}

/// Pure validity check.
pub fn is_valid_label_set(raw: &Value) -> bool {
    parse_label_set(raw).is_ok()
}

/// Validate and convert a JSON label array.
pub fn parse_label_set(raw: &Value) -> Result<LabelSet> {
    let items = raw
        .as_array()
        .ok_or_else(|| PromGateError::BadRequest("\"labels\" must be an array.".into()))?;

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let name = required_str(item, "name", i)?;
        let value = required_str(item, "value", i)?;
        out.push(Label::new(name, value));
    }
    let set = LabelSet(out);
    validate_label_names(&set)?;
    Ok(set)
}

/// Every name matches `[a-zA-Z_][a-zA-Z0-9_]*` and no name repeats.
pub fn validate_label_names(labels: &LabelSet) -> Result<()> {
    let mut seen = HashSet::with_capacity(labels.len());
    for l in labels.iter() {
        if !is_valid_label_name(&l.name) {
            return Err(PromGateError::BadRequest(format!("invalid label name: {}", l.name)));
        }
        if !seen.insert(l.name.as_str()) {
            return Err(PromGateError::BadRequest(format!("duplicate label name: {}", l.name)));
        }
    }
    Ok(())
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn required_str<'a>(item: &'a Value, field: &str, idx: usize) -> Result<&'a str> {
    match item.get(field) {
        None | Some(Value::Null) => Err(PromGateError::BadRequest(format!(
            "label {idx} is missing \"{field}\"."
        ))),
        Some(Value::String(s)) if s.is_empty() => Err(PromGateError::BadRequest(format!(
            "label {idx} has an empty \"{field}\"."
        ))),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(PromGateError::BadRequest(format!(
            "label {idx} \"{field}\" must be a string."
        ))),
    }
}
