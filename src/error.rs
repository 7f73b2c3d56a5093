//! Error types for the Passport OCR server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ocr::OcrError;
use crate::upload::{IngestError, UploadError};

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Request-boundary error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] UploadError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Recognition(#[from] OcrError),

    #[error("Processing timed out after {0} seconds")]
    Timeout(u64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(err) => err.status_code(),
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "Request rejected: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::RasterizeError;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::from(UploadError::NoFiles).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(IngestError::Rasterization(RasterizeError::NoPages)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(OcrError::ProcessingError("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Timeout(5).status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_messages_carry_underlying_failure() {
        let err = AppError::from(IngestError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "scratch is read-only",
        )));
        assert_eq!(err.to_string(), "scratch is read-only");

        let err = AppError::from(UploadError::InvalidFileFormat("cv.docx".into()));
        assert_eq!(err.to_string(), "Invalid file format for cv.docx");

        let err = AppError::from(std::io::Error::new(
            std::io::ErrorKind::Other,
            "No space left on device",
        ));
        assert_eq!(err.to_string(), "No space left on device");
    }

    #[test]
    fn test_multipart_status_is_preserved() {
        let err = AppError::from(UploadError::Multipart {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".into(),
        });
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_string(), "Failed to read upload: length limit exceeded");
    }
}
