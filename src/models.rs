//! Data models and structures
//!
//! Defines the per-request data flowing through the transform pipeline and
//! the environment-backed configuration.

use crate::prompts;

/// Default Gemini model with image output support.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// MIME type assumed when the backend omits one for generated images.
pub const DEFAULT_OUTPUT_MIME: &str = "image/jpeg";

/// An image buffered from the incoming request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadedImage {
    pub fn new(bytes: Vec<u8>, mime_type: String) -> Self {
        Self { bytes, mime_type }
    }
}

/// A single multimodal generation call: fixed instruction plus the upload.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub instruction: &'static str,
    pub image: UploadedImage,
}

impl GenerationRequest {
    pub fn new(image: UploadedImage) -> Self {
        Self {
            instruction: prompts::HEADSHOT,
            image,
        }
    }
}

/// One unit of the backend's streamed response.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Image {
        data: Vec<u8>,
        mime_type: Option<String>,
    },
    Text(String),
    Empty,
}

/// Result of reconciling a chunk stream.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Success { image: Vec<u8>, mime_type: String },
    SoftFailure { text: String },
    HardFailure { reason: String },
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,
}

impl Config {
    /// Reads `GEMINI_*` variables, loading `.env` first when present.
    ///
    /// A missing API key is not an error here; requests fail individually
    /// until one is configured.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
