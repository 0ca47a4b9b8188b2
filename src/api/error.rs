use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::domain::InvalidRunId;

/// Errors surfaced as plain-text HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// `message` is returned to the client, `detail` only logged.
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            ApiError::Internal { message, detail } => {
                tracing::error!(error = %detail, "{message}");
                message
            }
            other => {
                tracing::debug!(error = %other, "client error");
                other.to_string()
            }
        };

        (status, body).into_response()
    }
}

impl From<InvalidRunId> for ApiError {
    fn from(error: InvalidRunId) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}
