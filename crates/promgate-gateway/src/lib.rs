//! promgate gateway library entry.
//!
//! This crate wires config, application state, the metric write handlers and
//! the exposition endpoint into an axum router. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ops;
pub mod router;
