use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::jsonapi::ErrorDocument;
use crate::domain::pagination::PaginationError;
use crate::domain::repositories::RepositoryError;
use crate::domain::validation::ValidationErrors;

/// API error type mapped onto an HTTP response
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request input; rendered with an empty body
    BadRequest,
    /// Validation failure; rendered as a JSON:API `errors` document
    Unprocessable(ValidationErrors),
    /// Infrastructure failure outside the domain contract
    Internal(String),
}

impl ApiError {
    /// Creates a 400 Bad Request error
    pub fn bad_request() -> Self {
        Self::BadRequest
    }

    /// Creates a 422 Unprocessable Entity error
    pub fn unprocessable(errors: ValidationErrors) -> Self {
        Self::Unprocessable(errors)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::BadRequest => status.into_response(),
            ApiError::Unprocessable(errors) => {
                (status, Json(ErrorDocument::from(&errors))).into_response()
            }
            ApiError::Internal(message) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        tracing::warn!(error = %err, "rejected pagination parameters");
        Self::bad_request()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(errors) => Self::unprocessable(errors),
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, "database failure");
                Self::internal_server_error("Database error")
            }
        }
    }
}
