//! JSON shapes returned to the browser client.

use crate::models::GenerationOutcome;
use crate::{Error, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

pub const TEXT_INSTEAD_OF_IMAGE: &str =
    "The model returned text instead of an image. Please try again.";

/// Every body the transform endpoint can produce.
///
/// Unset fields are omitted, so request errors serialize as `{"error": ...}`
/// while generation results always carry `success`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TransformBody {
    pub fn success(image: &[u8], mime_type: &str) -> Self {
        Self {
            success: Some(true),
            image: Some(encode_data_uri(mime_type, image)),
            mime_type: Some(mime_type.to_string()),
            ..Default::default()
        }
    }

    pub fn text_only(text: String) -> Self {
        Self {
            success: Some(false),
            error: Some(TEXT_INSTEAD_OF_IMAGE.to_string()),
            text: Some(text),
            ..Default::default()
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: Some(false),
            error: Some(message),
            ..Default::default()
        }
    }

    pub fn error_only(message: String) -> Self {
        Self {
            error: Some(message),
            ..Default::default()
        }
    }
}

impl IntoResponse for TransformBody {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Maps a reconciled outcome to its status and body.
pub fn encode_outcome(outcome: &GenerationOutcome) -> (StatusCode, TransformBody) {
    match outcome {
        GenerationOutcome::Success { image, mime_type } => {
            (StatusCode::OK, TransformBody::success(image, mime_type))
        }
        GenerationOutcome::SoftFailure { text } => {
            (StatusCode::OK, TransformBody::text_only(text.clone()))
        }
        GenerationOutcome::HardFailure { reason } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            TransformBody::failure(reason.clone()),
        ),
    }
}

pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Splits a `data:<mime>;base64,<payload>` URI into MIME type and bytes.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::Generic("data URI must start with 'data:'".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Generic("data URI is missing ','".to_string()))?;
    let mime_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| Error::Generic("data URI is not base64 encoded".to_string()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::Generic(format!("Failed to decode data URI payload: {}", e)))?;

    Ok((mime_type.to_string(), bytes))
}
