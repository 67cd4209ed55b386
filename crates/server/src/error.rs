use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use expiry_ocr::{OcrError, PipelineError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No 'image' file part in the request.")]
    MissingImage,
    #[error("No image selected for upload.")]
    NoFilename,
    #[error("Uploaded image is empty.")]
    EmptyImage,
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("OCR reader not initialized.")]
    OcrUnavailable,
    #[error("An error occurred during expiry check: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::NoFilename | ApiError::EmptyImage => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Multipart(e) => e.status(),
            ApiError::OcrUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::EmptyImage => ApiError::EmptyImage,
            PipelineError::Ocr(OcrError::NotAvailable) => ApiError::OcrUnavailable,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "expiry check failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
