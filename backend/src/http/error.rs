//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::SnapshotError;
use crate::services::{PipelineError, SessionError};
use crate::sources::FetchError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
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
    /// Unknown session or article
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Operation needs state the session does not have yet
    Conflict(String),
    /// Internal server error
    Internal(String),
    /// Upstream collaborator failure
    Fetch(FetchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ApiError::new("INVALID_STATE", msg))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", msg),
                )
            }
            AppError::Fetch(e) => {
                let details = e.context().to_string();
                match e {
                    FetchError::NotFound { message, .. } => (
                        StatusCode::NOT_FOUND,
                        ApiError::new("NOT_FOUND", message).with_details(details),
                    ),
                    FetchError::Configuration { message, .. } => {
                        tracing::error!("Source misconfigured: {} {}", message, details);
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ApiError::new("SOURCE_CONFIGURATION", message).with_details(details),
                        )
                    }
                    other => {
                        tracing::warn!("Upstream fetch failed: {}", other);
                        (
                            StatusCode::BAD_GATEWAY,
                            ApiError::new("FETCH_ERROR", other.to_string()).with_details(details),
                        )
                    }
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Fetch(err)
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Fetch(e) => AppError::Fetch(e),
            PipelineError::InvalidState(msg) => AppError::Conflict(msg),
            PipelineError::InvalidRange(msg) | PipelineError::InvalidLocation(msg) => {
                AppError::BadRequest(msg)
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
            SessionError::InvalidId(_) => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
