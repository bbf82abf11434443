use crate::response::ErrorPayload;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("No image file provided")]
    MissingImage,

    #[error("No selected file")]
    EmptyFileName,

    #[error("Uploaded image is empty")]
    EmptyInput,

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Image dimensions too large: {0}")]
    DimensionsTooLarge(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to fetch image from {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Text recognition failed: {message}")]
    RecognitionFailed { message: String, engine_path: PathBuf },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure classes reported to clients in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ValidationError,
    FetchError,
    DecodeError,
    RecognitionError,
    InternalError,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::FetchError => StatusCode::BAD_REQUEST,
            Self::DecodeError | Self::RecognitionError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl OcrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OcrError::MissingImage
            | OcrError::EmptyFileName
            | OcrError::EmptyInput
            | OcrError::ImageTooLarge { .. }
            | OcrError::DimensionsTooLarge(_)
            | OcrError::InvalidRequest(_) => ErrorKind::ValidationError,
            OcrError::FetchFailed { .. } => ErrorKind::FetchError,
            OcrError::DecodeFailed(_) => ErrorKind::DecodeError,
            OcrError::RecognitionFailed { .. } => ErrorKind::RecognitionError,
            OcrError::InvalidConfig(_) | OcrError::Internal(_) => ErrorKind::InternalError,
        }
    }
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = kind.status();

        if status.is_server_error() {
            tracing::error!("Request failed ({:?}): {}", kind, self);
        } else {
            tracing::warn!("Request rejected ({:?}): {}", kind, self);
        }

        (status, Json(ErrorPayload::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let errors = [
            OcrError::MissingImage,
            OcrError::EmptyFileName,
            OcrError::EmptyInput,
            OcrError::ImageTooLarge { size: 10, max: 5 },
            OcrError::DimensionsTooLarge("1x4000 upscales to 1000x4000000".to_string()),
            OcrError::InvalidRequest("bad json".to_string()),
            OcrError::FetchFailed {
                url: "http://example.com/a.png".to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            },
        ];

        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_server_errors_map_to_internal_error() {
        let errors = [
            OcrError::DecodeFailed("not an image".to_string()),
            OcrError::RecognitionFailed {
                message: "engine missing".to_string(),
                engine_path: PathBuf::from("/usr/bin/tesseract"),
            },
            OcrError::Internal("task panicked".to_string()),
        ];

        for err in errors {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_fetch_error_kind() {
        let err = OcrError::FetchFailed {
            url: "http://localhost/x".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::FetchError);
        assert!(err.to_string().contains("connection refused"));
    }
}
