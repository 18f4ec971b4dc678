use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{models::ErrorResponse, response::json_response};

/// Request-level failures. None of them is fatal to the server.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input that could not be read at all: non-numeric ids, empty or
    /// malformed bodies.
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Well-formed input that breaks field rules.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("unsupported media type")]
    UnsupportedMediaType,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, errors) = match self {
            ApiError::BadRequest(reason) => ("invalid request", vec![reason]),
            ApiError::NotFound(reason) => ("movie not found", vec![reason]),
            ApiError::Validation(errors) => ("validation failed", errors),
            ApiError::UnsupportedMediaType
            | ApiError::PayloadTooLarge
            | ApiError::MethodNotAllowed => {
                return status.into_response();
            },
        };

        json_response(status, &ErrorResponse { message: message.to_string(), errors })
    }
}

pub type AppResult<T> = Result<T, ApiError>;
