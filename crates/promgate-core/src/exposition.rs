//! Prometheus text exposition format (0.0.4).
//!
//! Metrics render in registration order, series within a metric in label-key
//! order. Histogram and summary series put `le` / `quantile` ahead of the
//! caller's labels.

use std::fmt::Write;

use crate::instrument::{Instrument, Metric, HISTOGRAM_BUCKETS};
use crate::labels::LabelKey;
use crate::registry::Registry;

/// Content type for `/metrics` responses.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Magnitudes outside `[EXP_LOW, EXP_HIGH)` print in exponent form.
const EXP_HIGH: f64 = 1e21;
const EXP_LOW: f64 = 1e-7;

/// Format a sample value. Integral floats print without a fraction.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v == f64::INFINITY {
        "+Inf".into()
    } else if v == f64::NEG_INFINITY {
        "-Inf".into()
    } else if v != 0.0 && !(EXP_LOW..EXP_HIGH).contains(&v.abs()) {
        format!("{v:e}")
    } else {
        v.to_string()
    }
}

/// `{extra,k1="v1",...}` or the empty string when there is nothing to print.
fn label_str(extra: Option<(&str, &str)>, key: &LabelKey) -> String {
    let parts: Vec<String> = extra
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain(key.iter().cloned())
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(&v)))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", parts.join(","))
    }
}

pub fn render(registry: &Registry) -> String {
    let mut out = String::new();
    for m in registry.metrics() {
        render_metric(&m, &mut out);
    }
    out
}

pub fn render_metric(m: &Metric, out: &mut String) {
    let name = m.name();
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(m.help()));
    let _ = writeln!(out, "# TYPE {} {}", name, m.kind());

    match m.instrument() {
        Instrument::Counter(c) => {
            for (key, v) in c.snapshot() {
                let _ = writeln!(out, "{}{} {}", name, label_str(None, &key), format_value(v));
            }
        }
        Instrument::Gauge(g) => {
            for (key, v) in g.snapshot() {
                let _ = writeln!(out, "{}{} {}", name, label_str(None, &key), format_value(v));
            }
        }
        Instrument::Histogram(h) => {
            for (key, hist) in h.snapshot() {
                for (i, &le) in HISTOGRAM_BUCKETS.iter().enumerate() {
                    let le = format_value(le);
                    let _ = writeln!(
                        out,
                        "{}_bucket{} {}",
                        name,
                        label_str(Some(("le", le.as_str())), &key),
                        hist.buckets[i]
                    );
                }
                let _ = writeln!(
                    out,
                    "{}_bucket{} {}",
                    name,
                    label_str(Some(("le", "+Inf")), &key),
                    hist.count
                );
                let labels = label_str(None, &key);
                let _ = writeln!(out, "{}_sum{} {}", name, labels, format_value(hist.sum));
                let _ = writeln!(out, "{}_count{} {}", name, labels, hist.count);
            }
        }
        Instrument::Summary(s) => {
            for (key, snap) in s.snapshot() {
                for (q, v) in &snap.quantiles {
                    let q = format_value(*q);
                    let _ = writeln!(
                        out,
                        "{}{} {}",
                        name,
                        label_str(Some(("quantile", q.as_str())), &key),
                        format_value(*v)
                    );
                }
                let labels = label_str(None, &key);
                let _ = writeln!(out, "{}_sum{} {}", name, labels, format_value(snap.sum));
                let _ = writeln!(out, "{}_count{} {}", name, labels, snap.count);
            }
        }
    }
}
