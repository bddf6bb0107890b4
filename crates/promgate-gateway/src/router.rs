//! Axum router wiring.
//!
//! Each metric kind is one path: GET takes query params, POST takes a JSON body.

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::{app_state::AppState, handlers, ops};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.cfg().gateway.max_body_bytes;

    Router::new()
        .route("/counter", get(handlers::query::counter).post(handlers::body::counter))
        .route("/gauge", get(handlers::query::gauge).post(handlers::body::gauge))
        .route("/histogram", get(handlers::query::histogram).post(handlers::body::histogram))
        .route("/summary", get(handlers::query::summary).post(handlers::body::summary))
        .route("/metrics", get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
