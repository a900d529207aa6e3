use super::client::GeminiHttpClient;
use super::stream::chunk_stream;
use super::types::{Content, GenerationConfig, InlineData, Part, StreamRequest};
use crate::ai::{ChunkStream, HeadshotGenerator};
use crate::models::{Config, GenerationRequest};
use crate::Result;
use async_trait::async_trait;
use base64::Engine as _;

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: Option<String>,
        model: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = Self::new(config.gemini_api_key.clone(), config.gemini_model.clone());
        match &config.gemini_base_url {
            Some(base_url) => client.with_base_url(base_url.clone()),
            None => client,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    fn build_request(request: &GenerationRequest) -> StreamRequest {
        let data = base64::engine::general_purpose::STANDARD.encode(&request.image.bytes);

        StreamRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::Text {
                        text: request.instruction.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.image.mime_type.clone(),
                            data,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
            },
        }
    }
}

#[async_trait]
impl HeadshotGenerator for GeminiImageClient {
    fn check_credential(&self) -> Result<()> {
        self.http.api_key().map(|_| ())
    }

    async fn open_stream(&self, request: &GenerationRequest) -> Result<ChunkStream> {
        self.check_credential()?;

        tracing::debug!(
            "Opening Gemini stream (model: {}, image: {} bytes, {})",
            self.http.model(),
            request.image.bytes.len(),
            request.image.mime_type
        );

        let body = Self::build_request(request);
        let response = self.http.stream_generate_content(&body).await?;
        Ok(chunk_stream(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::models::{StreamChunk, UploadedImage};
    use crate::Error;
    use futures_util::StreamExt;
    use wiremock::matchers::{body_partial_json, header};
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

    fn make_client(server: &MockServer, api_key: Option<&str>) -> GeminiImageClient {
        GeminiImageClient::new(api_key.map(str::to_string), DEFAULT_MODEL.to_string())
            .with_base_url(server.uri())
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(UploadedImage::new(
            vec![0xFF, 0xD8, 0xFF, 0xE0],
            "image/jpeg".to_string(),
        ))
    }

    #[tokio::test]
    async fn test_stream_yields_text_then_image() {
        let server = MockServer::start().await;

        test_support::stream_endpoint(DEFAULT_MODEL)
            .respond_with(test_support::sse_response(&[
                serde_json::json!({
                    "candidates": [{ "content": { "parts": [{ "text": "Working on it" }] } }]
                }),
                serde_json::json!({
                    "candidates": [{ "content": { "parts": [{
                        "inlineData": { "mimeType": "image/png", "data": "iVBORw==" }
                    }] } }]
                }),
            ]))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key"));
        let chunks: Vec<StreamChunk> = client
            .open_stream(&request())
            .await
            .unwrap()
            .map(|c| c.unwrap())
            .collect()
            .await;

        assert_eq!(
            chunks,
            vec![
                StreamChunk::Text("Working on it".to_string()),
                StreamChunk::Image {
                    data: vec![0x89, 0x50, 0x4E, 0x47],
                    mime_type: Some("image/png".to_string()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_request_carries_key_prompt_image_and_modalities() {
        let server = MockServer::start().await;

        test_support::stream_endpoint(DEFAULT_MODEL)
            .and(header("x-goog-api-key", "secret"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
            })))
            .and(wiremock::matchers::body_string_contains(
                "\"inlineData\":{\"mimeType\":\"image/jpeg\",\"data\":\"/9j/4A==\"}",
            ))
            .and(wiremock::matchers::body_string_contains(
                "The Universal Corporate Headshot Prompt",
            ))
            .respond_with(test_support::sse_response(&[]))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, Some("secret"));
        let chunks: Vec<_> = client.open_stream(&request()).await.unwrap().collect().await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_returns_backend_unavailable() {
        let server = MockServer::start().await;

        test_support::stream_endpoint(DEFAULT_MODEL)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = make_client(&server, Some("key"));
        let err = client.open_stream(&request()).await.err().unwrap();
        assert!(matches!(err, Error::BackendUnavailable(ref m) if m.contains("429")));
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_backend() {
        let server = MockServer::start().await;

        test_support::stream_endpoint(DEFAULT_MODEL)
            .respond_with(test_support::sse_response(&[]))
            .expect(0)
            .mount(&server)
            .await;

        let client = make_client(&server, None);
        assert!(matches!(
            client.check_credential(),
            Err(Error::MissingCredential)
        ));
        let err = client.open_stream(&request()).await.err().unwrap();
        assert!(matches!(err, Error::MissingCredential));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_backend_unavailable() {
        let client = GeminiImageClient::new(Some("key".to_string()), DEFAULT_MODEL.to_string())
            .with_base_url("http://127.0.0.1:9".to_string());

        let err = client.open_stream(&request()).await.err().unwrap();
        assert!(matches!(err, Error::BackendUnavailable(_)));
    }

    #[test]
    fn test_from_config_applies_base_url_and_model() {
        let client = GeminiImageClient::from_config(&Config {
            gemini_api_key: Some("key".to_string()),
            gemini_model: "models/custom-image".to_string(),
            gemini_base_url: Some("http://localhost:8080/".to_string()),
        });

        assert_eq!(client.model(), "custom-image");
        assert_eq!(client.http.base_url, "http://localhost:8080");
    }
}
