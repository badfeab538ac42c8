//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use product_search_repository::SearchError;

/// Message returned for every internal failure; details are only logged.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Errors returned by the HTTP handlers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request was malformed.
    #[error("{0}")]
    InvalidRequest(String),

    /// The target index does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The search engine is not connected or unreachable.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Any other failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to callers.
    pub fn public_message(&self) -> &str {
        match self {
            ApiError::Internal(_) => INTERNAL_MESSAGE,
            ApiError::InvalidRequest(m) | ApiError::NotFound(m) | ApiError::ServiceUnavailable(m) => m,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidRequest(m) => ApiError::InvalidRequest(m),
            SearchError::NotFound(m) => ApiError::NotFound(m),
            SearchError::ServiceUnavailable(m) | SearchError::EngineUnavailable(m) => {
                ApiError::ServiceUnavailable(m)
            }
            SearchError::SchemaError(m) | SearchError::InternalError(m) => ApiError::Internal(m),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error_code = error_code,
                status_code = status.as_u16(),
                message = %self,
                "Request error"
            );
        } else {
            tracing::debug!(
                error_code = error_code,
                status_code = status.as_u16(),
                message = %self,
                "Request rejected"
            );
        }

        let body = Json(json!({
            "error": error_code,
            "message": self.public_message(),
        }));

        (status, body).into_response()
    }
}
