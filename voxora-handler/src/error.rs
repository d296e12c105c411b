use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Text is required")]
    MissingText,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("No audio stream returned from Polly")]
    MissingAudio,

    #[error("Upload failed: {0}")]
    Upload(String),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingText | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Synthesis(_) | Self::MissingAudio | Self::Upload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// What the caller sees. Server-side failures are not described beyond
    /// a generic message; the details go to the log.
    pub fn public_message(&self) -> String {
        match self {
            Self::MissingText | Self::InvalidBody(_) => self.to_string(),
            _ => "Failed to process text-to-speech conversion".to_string(),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "text-to-speech conversion failed");
        } else {
            tracing::debug!(error = %self, "rejected text-to-speech request");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
