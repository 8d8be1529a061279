/*
 * Responsibility
 * - Gate construction error (GateConfigError)
 * - Host-side AppError and its IntoResponse (HTTP status / JSON error body)
 * - Authentication failures are NOT errors here: the gate resolves them into Decision::Reject
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Raised while building a `TokenGate`. Never surfaces per request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateConfigError {
    #[error("No secret value provided!")]
    MissingSecret,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gate(#[from] GateConfigError),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Config(_) | AppError::Gate(_) | AppError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
            }
        };

        // Configuration details stay in the logs.
        let message = match &self {
            AppError::Unauthorized => self.to_string(),
            _ => "internal server error".into(),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}
