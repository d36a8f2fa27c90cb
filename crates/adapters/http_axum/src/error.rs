//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use devhub_domain::error::{DevHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`DevHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(DevHubError);

impl From<DevHubError> for ApiError {
    fn from(err: DevHubError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            DevHubError::Validation(_) => StatusCode::BAD_REQUEST,
            DevHubError::NotFound(_) => StatusCode::NOT_FOUND,
            DevHubError::AlreadyExists(_) => StatusCode::CONFLICT,
            DevHubError::InUse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DevHubError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            DevHubError::Storage(err) => {
                tracing::error!(error = ?err, "storage error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
