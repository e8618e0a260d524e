//! Unified error types for the Radar API
//!
//! This module defines error types for each layer:
//! - `AnalysisError`: Core analysis errors
//! - `EthosError`: Ethos API client errors
//! - `AppError`: Application layer errors (wraps the others for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Analysis layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The subject has no reviews at all, so no assessment can be produced.
    #[error("Insufficient review data for {0}")]
    InsufficientData(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Ethos API client errors
#[derive(Debug, Error)]
pub enum EthosError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream timed out")]
    Timeout,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    #[error("Ethos error: {0}")]
    Ethos(#[from] EthosError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Analysis(AnalysisError::InsufficientData(userkey)) => (
                StatusCode::NOT_FOUND,
                "Unable to analyze user - user not found or insufficient data",
                Some(userkey.clone()),
            ),
            AppError::Analysis(AnalysisError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Ethos(e) => {
                tracing::error!("Ethos error: {}", e);
                match e {
                    EthosError::RateLimited => {
                        (StatusCode::TOO_MANY_REQUESTS, "Rate limited", None)
                    }
                    // Upstream failures are never the caller's fault; keep the
                    // message generic and the detail in the logs.
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        "Reputation service unavailable",
                        None,
                    ),
                }
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
