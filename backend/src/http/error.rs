//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::chain::ChainError;
use crate::services::{CatalogError, CertificateError, CompletionError};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// The request is valid but the course state refuses it
    Conflict(CompletionError),
    Chain(ChainError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Conflict(e @ CompletionError::InvalidIndex(_)) => {
                (StatusCode::BAD_REQUEST, ApiError::new("INVALID_INDEX", e.to_string()))
            }
            AppError::Conflict(e) => (
                StatusCode::CONFLICT,
                ApiError::new("MILESTONE_LOCKED", e.to_string()),
            ),
            AppError::Chain(e) => {
                let details = e.context().to_string();
                if e.is_not_found() {
                    (
                        StatusCode::NOT_FOUND,
                        ApiError::new("NOT_FOUND", e.to_string()).with_details(details),
                    )
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("CHAIN_ERROR", e.to_string()).with_details(details),
                    )
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        AppError::Chain(err)
    }
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        AppError::Conflict(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<CertificateError> for AppError {
    fn from(err: CertificateError) -> Self {
        AppError::BadRequest(format!("Invalid certificate metadata: {}", err))
    }
}
