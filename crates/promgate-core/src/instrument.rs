//! Metric instruments with dynamic labels.
//!
//! Each vector keeps one accumulator per label combination in a `DashMap`.
//! Updates go through the map's entry API, so a series is mutated under its
//! shard lock and concurrent writers to the same series never lose updates.
//! Label keys are sorted pairs (see [`LabelSet::key`]) to keep series identity
//! independent of request ordering.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::{PromGateError, Result};
use crate::labels::{validate_label_names, LabelKey, LabelSet};

/// Fixed histogram upper bounds. `+Inf` is implicit and equals the count.
pub const HISTOGRAM_BUCKETS: [f64; 4] = [0.1, 1.0, 5.0, 10.0];

/// Quantiles reported for every summary series.
pub const SUMMARY_QUANTILES: [f64; 3] = [0.5, 0.9, 0.99];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
    Summary,
}

impl MetricKind {
    /// Name used in `# TYPE` lines.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
            MetricKind::Summary => "summary",
        }
    }

    /// Value applied when a request carries none: counters step by 1,
    /// everything else records 0.
    pub fn default_value(self) -> f64 {
        match self {
            MetricKind::Counter => 1.0,
            MetricKind::Gauge | MetricKind::Histogram | MetricKind::Summary => 0.0,
        }
    }

    /// Reject values this kind cannot record. Handlers call this before
    /// touching the registry so a bad request never registers a metric.
    pub fn check_value(self, v: f64) -> Result<()> {
        if !v.is_finite() {
            return Err(PromGateError::BadRequest(format!("value must be finite, got {v}")));
        }
        if self == MetricKind::Counter && v < 0.0 {
            return Err(PromGateError::BadRequest(format!(
                "counter increment must be non-negative, got {v}"
            )));
        }
        Ok(())
    }

    /// Label name this kind adds to its own series, if any.
    pub fn reserved_label(self) -> Option<&'static str> {
        match self {
            MetricKind::Histogram => Some("le"),
            MetricKind::Summary => Some("quantile"),
            MetricKind::Counter | MetricKind::Gauge => None,
        }
    }

    /// Reject label sets this kind cannot expose: bad or repeated names, or
    /// the kind's reserved `le` / `quantile`.
    pub fn check_labels(self, labels: &LabelSet) -> Result<()> {
        validate_label_names(labels)?;
        if let Some(reserved) = self.reserved_label() {
            if labels.iter().any(|l| l.name == reserved) {
                return Err(PromGateError::BadRequest(format!(
                    "label name \"{reserved}\" is reserved for {self} metrics"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sliding window used for summary quantiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryWindow {
    /// Most recent observations kept per series.
    pub max_samples: usize,
    /// Observations older than this are ignored. `None` keeps them until evicted by count.
    pub max_age: Option<Duration>,
}

impl Default for SummaryWindow {
    fn default() -> Self {
        Self { max_samples: 1024, max_age: None }
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, f64>,
}

impl CounterVec {
    /// Increment by a non-negative delta.
    pub fn add(&self, labels: &LabelSet, delta: f64) -> Result<()> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(PromGateError::BadRequest(format!(
                "counter increment must be a non-negative number, got {delta}"
            )));
        }
        *self.map.entry(labels.key()).or_insert(0.0) += delta;
        Ok(())
    }

    pub fn get(&self, labels: &LabelSet) -> Option<f64> {
        self.map.get(&labels.key()).map(|r| *r.value())
    }

    pub fn snapshot(&self) -> Vec<(LabelKey, f64)> {
        sorted(self.map.iter().map(|r| (r.key().clone(), *r.value())))
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, f64>,
}

impl GaugeVec {
    /// Last write wins.
    pub fn set(&self, labels: &LabelSet, v: f64) {
        self.map.insert(labels.key(), v);
    }

    pub fn get(&self, labels: &LabelSet) -> Option<f64> {
        self.map.get(&labels.key()).map(|r| *r.value())
    }

    pub fn snapshot(&self) -> Vec<(LabelKey, f64)> {
        sorted(self.map.iter().map(|r| (r.key().clone(), *r.value())))
    }
}

/// Per-series histogram state. `buckets[i]` is cumulative for `HISTOGRAM_BUCKETS[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramSeries {
    pub buckets: [u64; HISTOGRAM_BUCKETS.len()],
    pub sum: f64,
    pub count: u64,
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, HistogramSeries>,
}

impl HistogramVec {
    /// Observe a value and increment every bucket whose bound is >= value.
    pub fn observe(&self, labels: &LabelSet, v: f64) {
        let mut hist = self.map.entry(labels.key()).or_default();

        hist.count += 1;
        hist.sum += v;

        for (i, &b) in HISTOGRAM_BUCKETS.iter().enumerate() {
            if v <= b {
                hist.buckets[i] += 1;
            }
        }
    }

    pub fn get(&self, labels: &LabelSet) -> Option<HistogramSeries> {
        self.map.get(&labels.key()).map(|r| r.value().clone())
    }

    pub fn snapshot(&self) -> Vec<(LabelKey, HistogramSeries)> {
        sorted(self.map.iter().map(|r| (r.key().clone(), r.value().clone())))
    }
}

#[derive(Debug, Default)]
struct SummarySeries {
    sum: f64,
    count: u64,
    samples: VecDeque<(Instant, f64)>,
}

/// Point-in-time view of one summary series.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySnapshot {
    pub sum: f64,
    pub count: u64,
    /// `(quantile, estimate)` for each of `SUMMARY_QUANTILES`.
    pub quantiles: Vec<(f64, f64)>,
}

#[derive(Default)]
pub struct SummaryVec {
    window: SummaryWindow,
    map: DashMap<LabelKey, SummarySeries>,
}

impl SummaryVec {
    pub fn new(window: SummaryWindow) -> Self {
        Self { window, map: DashMap::new() }
    }

    /// Add to sum/count and push the value into the series window.
    pub fn observe(&self, labels: &LabelSet, v: f64) {
        let now = Instant::now();
        let mut s = self.map.entry(labels.key()).or_default();

        s.sum += v;
        s.count += 1;
        s.samples.push_back((now, v));

        while s.samples.len() > self.window.max_samples.max(1) {
            s.samples.pop_front();
        }
        if let Some(max_age) = self.window.max_age {
            while s
                .samples
                .front()
                .is_some_and(|(at, _)| now.duration_since(*at) > max_age)
            {
                s.samples.pop_front();
            }
        }
    }

    pub fn get(&self, labels: &LabelSet) -> Option<SummarySnapshot> {
        let now = Instant::now();
        self.map
            .get(&labels.key())
            .map(|r| self.snapshot_series(r.value(), now))
    }

    pub fn snapshot(&self) -> Vec<(LabelKey, SummarySnapshot)> {
        let now = Instant::now();
        sorted(
            self.map
                .iter()
                .map(|r| (r.key().clone(), self.snapshot_series(r.value(), now))),
        )
    }

    fn snapshot_series(&self, s: &SummarySeries, now: Instant) -> SummarySnapshot {
        let mut values: Vec<f64> = s
            .samples
            .iter()
            .filter(|(at, _)| match self.window.max_age {
                Some(max_age) => now.duration_since(*at) <= max_age,
                None => true,
            })
            .map(|(_, v)| *v)
            .collect();
        values.sort_by(f64::total_cmp);

        SummarySnapshot {
            sum: s.sum,
            count: s.count,
            quantiles: SUMMARY_QUANTILES
                .iter()
                .map(|&q| (q, quantile(&values, q)))
                .collect(),
        }
    }
}

/// Quantile over sorted values. Each value is unit mass centred at rank
/// `i + 0.5`; ranks between two centres interpolate linearly.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
        return f64::NAN;
    };

    let rank = q * n as f64;
    if rank <= 0.5 {
        return first;
    }
    if rank >= n as f64 - 0.5 {
        return last;
    }

    let lo = (rank - 0.5).floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - (lo as f64 + 0.5);
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

fn sorted<T>(it: impl Iterator<Item = (LabelKey, T)>) -> Vec<(LabelKey, T)> {
    let mut out: Vec<_> = it.collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

/// Tagged instrument state.
pub enum Instrument {
    Counter(CounterVec),
    Gauge(GaugeVec),
    Histogram(HistogramVec),
    Summary(SummaryVec),
}

impl Instrument {
    pub fn new(kind: MetricKind, window: SummaryWindow) -> Self {
        match kind {
            MetricKind::Counter => Instrument::Counter(CounterVec::default()),
            MetricKind::Gauge => Instrument::Gauge(GaugeVec::default()),
            MetricKind::Histogram => Instrument::Histogram(HistogramVec::default()),
            MetricKind::Summary => Instrument::Summary(SummaryVec::new(window)),
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Instrument::Counter(_) => MetricKind::Counter,
            Instrument::Gauge(_) => MetricKind::Gauge,
            Instrument::Histogram(_) => MetricKind::Histogram,
            Instrument::Summary(_) => MetricKind::Summary,
        }
    }
}

/// A registered metric: identity, help text, label schema and state.
pub struct Metric {
    name: String,
    help: String,
    label_names: Vec<String>,
    created_seq: u64,
    instrument: Instrument,
}

impl Metric {
    pub(crate) fn new(
        name: String,
        kind: MetricKind,
        help: String,
        label_names: Vec<String>,
        created_seq: u64,
        window: SummaryWindow,
    ) -> Self {
        Self {
            name,
            help,
            label_names,
            created_seq,
            instrument: Instrument::new(kind, window),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Label names recorded when the metric was first created.
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn kind(&self) -> MetricKind {
        self.instrument.kind()
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub(crate) fn created_seq(&self) -> u64 {
        self.created_seq
    }

    /// Route a value into this metric using its own kind's semantics.
    /// `None` applies the kind's default (see [`MetricKind::default_value`]).
    pub fn apply(&self, labels: &LabelSet, value: Option<f64>) -> Result<()> {
        let v = value.unwrap_or_else(|| self.kind().default_value());
        self.kind().check_value(v)?;
        self.kind().check_labels(labels)?;

        if !self.matches_schema(labels) {
            tracing::debug!(
                metric = %self.name,
                schema = ?self.label_names,
                got = ?labels.names(),
                "label names differ from metric schema"
            );
        }

        match &self.instrument {
            Instrument::Counter(c) => c.add(labels, v),
            Instrument::Gauge(g) => {
                g.set(labels, v);
                Ok(())
            }
            Instrument::Histogram(h) => {
                h.observe(labels, v);
                Ok(())
            }
            Instrument::Summary(s) => {
                s.observe(labels, v);
                Ok(())
            }
        }
    }

    fn matches_schema(&self, labels: &LabelSet) -> bool {
        let mut want: Vec<&str> = self.label_names.iter().map(String::as_str).collect();
        let mut got: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        want.sort_unstable();
        got.sort_unstable();
        want == got
    }
}
