use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::error;

use super::models::ErrorResponse;
use crate::dispatch::DispatchError;
use crate::sections::RegistryError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("payload invalid: {0}")]
    InvalidPayload(String),
    #[error("payload exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("section not found: {0}")]
    SectionNotFound(String),
    #[error("{0}")]
    SectionUpdate(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::SectionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SectionUpdate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Value of the `error` field in the response body
    pub fn label(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "Bad Request",
            ApiError::PayloadTooLarge(_) => "Payload Too Large",
            ApiError::SectionNotFound(_) => "Section not found",
            ApiError::SectionUpdate(_) => "Failed to save sections",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }

    /// Value of the `message` field; unknown sections carry none.
    pub fn message(&self) -> Option<String> {
        match self {
            ApiError::SectionNotFound(_) => None,
            other => Some(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.label(),
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(value.to_string())
    }
}

impl From<DispatchError> for ApiError {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::NotFound(label) => ApiError::SectionNotFound(label),
            DispatchError::Upstream(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(value: RegistryError) -> Self {
        ApiError::SectionUpdate(value.to_string())
    }
}
