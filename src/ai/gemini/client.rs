use crate::{Error, Result};
use reqwest::Client;
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Lightweight Gemini REST client for the streaming generation endpoint.
pub struct GeminiHttpClient {
    pub(crate) client: Client,
    api_key: Option<String>,
    model: String,
    pub(crate) base_url: String,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example
    /// `gemini-2.5-flash-image-preview`), not a `models/...`-prefixed path
    /// segment. No request timeout is set beyond the client's defaults.
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self::new_with_client(api_key, model, Client::new())
    }

    pub fn new_with_client(api_key: Option<String>, model: String, client: Client) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(Error::MissingCredential)
    }

    /// Opens `streamGenerateContent` in SSE mode and returns the response
    /// once the status line has been checked. The body is left unread.
    pub async fn stream_generate_content<Req: Serialize>(
        &self,
        request: &Req,
    ) -> Result<reqwest::Response> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                Error::BackendUnavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::BackendUnavailable(format!(
                "Gemini API error (status {}): {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}
