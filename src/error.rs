//! Error types for the Course Host server

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("No launch file found: {0}")]
    NoLaunchFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Range not satisfiable for {size} byte resource")]
    RangeNotSatisfiable { size: u64 },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Machine-readable error kind, as sent in the `error` field
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidFormat(_) => "invalid_format",
            AppError::ExtractionFailed(_) | AppError::Zip(_) => "extraction_failed",
            AppError::NoLaunchFound(_) => "no_launch_found",
            AppError::NotFound(_) => "not_found",
            AppError::Forbidden(_) => "forbidden",
            AppError::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            AppError::Internal(_) | AppError::XmlParse(_) | AppError::Io(_) => "server_error",
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NoLaunchFound(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden(msg) => {
                tracing::warn!("Forbidden request: {}", msg);
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }
            AppError::ExtractionFailed(msg) => {
                tracing::error!("Extraction failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An error occurred during upload and extraction: {}", msg),
                )
            }
            AppError::Zip(e) => {
                tracing::error!("ZIP error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An error occurred during upload and extraction: {}", e),
                )
            }
            AppError::RangeNotSatisfiable { size } => {
                return (
                    StatusCode::RANGE_NOT_SATISFIABLE,
                    [(header::CONTENT_RANGE, format!("bytes */{}", size))],
                )
                    .into_response();
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::XmlParse(e) => {
                tracing::error!("XML parse error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: self.kind(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_has_content_range_and_no_body() {
        let response = AppError::RangeNotSatisfiable { size: 1000 }.into_response();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes */1000"
        );
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(AppError::Forbidden("x".into()).kind(), "forbidden");
        assert_eq!(AppError::NoLaunchFound("x".into()).kind(), "no_launch_found");
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(AppError::from(io).kind(), "server_error");
    }

    #[test]
    fn test_io_error_message_is_generic() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "/secret/path");
        let response = AppError::from(io).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
