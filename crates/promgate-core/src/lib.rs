//! promgate core: metric registry, instruments, label validation and the
//! Prometheus text encoder.
//!
//! This crate owns every piece of state the gateway mutates. It carries no
//! transport or runtime dependencies so the registry can be driven directly from
//! tests or embedded in another server.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `PromGateError`/`Result`, so a malformed request can never take
//! the process down or leave an accumulator half-updated.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod instrument;
pub mod labels;
pub mod registry;
pub mod value;

/// Shared result type.
pub use error::{PromGateError, Result};
pub use instrument::{Instrument, Metric, MetricKind, SummaryWindow};
pub use labels::{Label, LabelSet};
pub use registry::Registry;
