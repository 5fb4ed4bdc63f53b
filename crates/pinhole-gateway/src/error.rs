use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pinhole_core::ShortenerError;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error("stored url for '{0}' is not a valid Location header")]
    InvalidLocation(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Shortener(err) => match err {
                ShortenerError::Validation(_)
                | ShortenerError::InvalidDate(_)
                | ShortenerError::KeyConflict(_) => StatusCode::BAD_REQUEST,
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::Expired(_) => StatusCode::GONE,
                ShortenerError::KeyGenerationExhausted { .. } | ShortenerError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::InvalidLocation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = match self {
            AppError::Shortener(err) => err,
            err @ AppError::InvalidLocation(_) => {
                error!(error = %err, "request failed");
                return (status, "Internal server error").into_response();
            }
        };

        let message = match err {
            ShortenerError::Validation(message) => message,
            ShortenerError::InvalidDate(_) => "Invalid date format (YYYY-MM-DD)".to_string(),
            ShortenerError::KeyConflict(_) => "Custom key already exists".to_string(),
            ShortenerError::NotFound(_) => "URL not found".to_string(),
            ShortenerError::Expired(_) => "URL has expired".to_string(),
            err @ (ShortenerError::KeyGenerationExhausted { .. } | ShortenerError::Storage(_)) => {
                error!(error = %err, "request failed");
                "Internal server error".to_string()
            }
        };

        (status, message).into_response()
    }
}
