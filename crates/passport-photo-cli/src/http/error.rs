//! HTTP error responses.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use passport_photo_core::{AnalysisError, ImageLoadError};
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{error, warn};

/// Everything the upload endpoint can fail with. Rendered as
/// `{"error": message}` with a status chosen per variant.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No multipart field named `file` carrying a filename.
    #[error("No file part")]
    NoFilePart,

    /// The `file` field has an empty filename.
    #[error("No selected file")]
    NoSelectedFile,

    /// The request is not a usable multipart body.
    #[error(transparent)]
    Rejection(#[from] MultipartRejection),

    /// Reading the multipart stream failed, including hitting the body limit.
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// The upload is not a decodable image.
    #[error(transparent)]
    Image(#[from] ImageLoadError),

    /// A perception service failed or the face record was incomplete.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The blocking analysis task panicked or was cancelled.
    #[error("analysis task failed: {0}")]
    Task(#[from] JoinError),
}

impl ApiError {
    /// Status code for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFilePart | Self::NoSelectedFile | Self::Image(_) => StatusCode::BAD_REQUEST,
            Self::Rejection(e) => e.status(),
            Self::Multipart(e) => e.status(),
            Self::Analysis(AnalysisError::Gateway(_)) => StatusCode::BAD_GATEWAY,
            Self::Analysis(AnalysisError::Precondition(_)) | Self::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Rejection(e) => e.body_text(),
            Self::Multipart(e) => e.body_text(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
