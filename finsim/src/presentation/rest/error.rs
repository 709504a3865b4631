use crate::application::{AuthError, ErrorCategory, GameError};
use crate::presentation::rest::dto::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub code: &'static str,
    pub category: ErrorCategory,
    pub message: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            code,
            category: ErrorCategory::Validation,
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn missing_token() -> Self {
        ApiError {
            code: "INVALID_TOKEN",
            category: ErrorCategory::Auth,
            message: "Missing bearer token".to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn invalid_body(reason: impl Into<String>) -> Self {
        Self::bad_request("INVALID_INPUT", reason)
    }
}

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        let category = e.category();
        let status = match category {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Auth => match e {
                GameError::Auth(AuthError::InvalidToken) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::FORBIDDEN,
            },
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::Upstream if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ErrorCategory::Upstream => StatusCode::BAD_GATEWAY,
            ErrorCategory::InsufficientFunds => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCategory::Internal => match e {
                GameError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        if status.is_server_error() {
            tracing::error!(code = e.code(), error = %e, "Request failed");
        }

        ApiError {
            code: e.code(),
            category,
            message: e.to_string(),
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(
            self.code,
            self.category.to_string(),
            self.message,
        ));
        (self.status, body).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
