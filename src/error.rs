//! Error handling and custom error types
//!
//! Provides unified error handling across the service using thiserror. Every
//! variant is converted into a JSON body at the request boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::response::TransformBody;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No image file uploaded")]
    NoFileProvided,

    #[error("Image exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: usize },

    #[error("GEMINI_API_KEY not configured")]
    MissingCredential,

    #[error("Gemini backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Failed to generate headshot image")]
    NoUsableOutput,

    #[error("Malformed upload: {0}")]
    Multipart(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NoFileProvided | Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            // Request and configuration problems carry no `success` flag.
            Error::NoFileProvided
            | Error::Multipart(_)
            | Error::PayloadTooLarge { .. }
            | Error::MissingCredential => {
                tracing::info!("Rejected transform request: {}", self);
                TransformBody::error_only(self.to_string())
            }
            _ => {
                tracing::error!("Error processing image: {}", self);
                TransformBody::failure(self.to_string())
            }
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors_map_to_client_statuses() {
        assert_eq!(Error::NoFileProvided.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::Multipart("bad boundary".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::PayloadTooLarge { limit: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_server_errors_map_to_500() {
        assert_eq!(
            Error::MissingCredential.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::BackendUnavailable("quota".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::NoUsableOutput.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_match_client_contract() {
        assert_eq!(Error::NoFileProvided.to_string(), "No image file uploaded");
        assert_eq!(
            Error::MissingCredential.to_string(),
            "GEMINI_API_KEY not configured"
        );
        assert_eq!(
            Error::NoUsableOutput.to_string(),
            "Failed to generate headshot image"
        );
    }
}
