use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;
use votes_pipeline::VoteServiceError;

use crate::response::ApiResponse;

/// Errors returned to HTTP clients, rendered in the response envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] VoteServiceError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Service(err) => match err {
                VoteServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                VoteServiceError::ConcurrentConflict { .. } => StatusCode::CONFLICT,
                VoteServiceError::AlreadyExists { .. } => StatusCode::CONFLICT,
                VoteServiceError::SelfVote { .. } => StatusCode::FORBIDDEN,
                VoteServiceError::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                VoteServiceError::CorruptItem(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Client-facing message. Store failures are logged, not echoed.
    pub fn message(&self) -> String {
        match self {
            Self::Service(VoteServiceError::NotFound { kind, .. }) => format!("{kind} not found!"),
            Self::Service(VoteServiceError::ConcurrentConflict { .. }) => {
                "Too many simultaneous votes on this item, please try again".to_string()
            }
            Self::Service(VoteServiceError::PersistenceUnavailable(_)) => {
                "Service temporarily unavailable, please try again".to_string()
            }
            Self::Service(VoteServiceError::CorruptItem(_)) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        }
        (status, Json(ApiResponse::<()>::failure(self.message()))).into_response()
    }
}
