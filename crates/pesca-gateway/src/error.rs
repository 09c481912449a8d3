//! Error handling for the gateway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pesca_core::SuggestionError;
use serde::Serialize;
use tracing::error;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Internal server error.
    Internal(String),
    /// Bad request.
    BadRequest(String),
    /// Not found.
    NotFound(String),
    /// Production store not configured.
    Unavailable(String),
    /// Database failure.
    Database(String),
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg),
            AppError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", msg),
        };

        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<pesca_store::Error> for AppError {
    fn from(err: pesca_store::Error) -> Self {
        match err {
            pesca_store::Error::InvalidStatsKind(_) => AppError::BadRequest(err.to_string()),
            err => {
                error!(error = %err, "Production store error");
                AppError::Database(err.to_string())
            }
        }
    }
}

impl From<pesca_core::Error> for AppError {
    fn from(err: pesca_core::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<SuggestionError> for AppError {
    fn from(err: SuggestionError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Unavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_invalid_stats_kind_is_bad_request() {
        let err = AppError::from(pesca_store::Error::InvalidStatsKind("x".into()));
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Tipo de consulta no válido"));
    }

    #[test]
    fn test_suggestion_error_message() {
        let err = AppError::from(SuggestionError::CommentTooShort);
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("10 caracteres")));
    }
}
