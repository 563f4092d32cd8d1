//! Service error type
//!
//! Upload problems map to 400 and everything else to 500. Response bodies
//! carry a fixed message; the cause is logged, not returned.

use sat_triage_core::ParseError;
use thiserror::Error;

pub const UPLOAD_FAILED_MESSAGE: &str = "Image upload failed.";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze image";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("no image uploaded")]
    MissingUpload,

    #[error("invalid upload: {0}")]
    Upload(String),

    #[error("vision provider failed: {0:#}")]
    Upstream(anyhow::Error),

    #[error("model output rejected: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingUpload | Self::Upload(_))
    }

    /// Message shown to API clients.
    pub fn public_message(&self) -> &'static str {
        if self.is_client_error() {
            UPLOAD_FAILED_MESSAGE
        } else {
            ANALYSIS_FAILED_MESSAGE
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };

    use super::AppError;

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = if self.is_client_error() {
                tracing::warn!("Rejected upload: {}", self);
                StatusCode::BAD_REQUEST
            } else {
                tracing::error!("Image analysis failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            };
            let body = serde_json::json!({ "error": self.public_message() });
            (status, Json(body)).into_response()
        }
    }
}
