//! HTTP mapping for `PromGateError`.
//!
//! Failures are plain text: status code plus a human-readable message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use promgate_core::error::{ClientCode, PromGateError};
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub PromGateError);

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(PromGateError::BadRequest(msg.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.client_code() {
            ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match self.0 {
            PromGateError::BadRequest(msg) => msg,
            other => other.to_string(),
        };
        tracing::debug!(%status, %body, "request rejected");
        (status, body).into_response()
    }
}
