//! Gemini payload types for the streaming image call.

use crate::models::StreamChunk;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Gemini content container used in both requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Untagged union of text and inline media content parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding. `Other` keeps
/// unknown part shapes (thought signatures, function calls) from failing the
/// whole chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(serde_json::Value),
}

/// Base64 inline payload used for image requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct StreamRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

/// One `streamGenerateContent` event payload.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub error: Option<ApiError>,
}

/// Candidate completion item returned by Gemini.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

/// Error document Gemini may emit in place of a chunk.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl GenerateContentResponse {
    /// Reduces the first candidate to a chunk.
    ///
    /// Inline data wins over text; undecodable inline data is dropped.
    pub fn into_chunk(self) -> StreamChunk {
        let Some(content) = self.candidates.into_iter().next().and_then(|c| c.content) else {
            return StreamChunk::Empty;
        };

        if let Some(inline) = content.parts.iter().find_map(|part| match part {
            Part::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }) {
            return match base64::engine::general_purpose::STANDARD.decode(&inline.data) {
                Ok(data) => StreamChunk::Image {
                    data,
                    mime_type: Some(inline.mime_type.clone()).filter(|m| !m.is_empty()),
                },
                Err(e) => {
                    tracing::warn!("Skipping chunk with undecodable inline data: {}", e);
                    StreamChunk::Empty
                }
            };
        }

        let text: String = content
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if text.is_empty() {
            StreamChunk::Empty
        } else {
            StreamChunk::Text(text)
        }
    }
}
