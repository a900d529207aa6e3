//! Request-scoped deployment shape.
//!
//! A function host hands over one event per invocation. The event is replayed
//! through [`transform_router`] so both deployment shapes share the exact same
//! handler.

use std::collections::{BTreeMap, HashMap};

use axum::body::Body;
use axum::http::Request;
use base64::Engine as _;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

use crate::web::{transform_router, AppState, TRANSFORM_PATH};
use crate::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl FunctionEvent {
    fn decoded_body(&self) -> Result<Vec<u8>> {
        match &self.body {
            None => Ok(Vec::new()),
            Some(body) if self.is_base64_encoded => base64::engine::general_purpose::STANDARD
                .decode(body)
                .map_err(|e| Error::Multipart(format!("Invalid base64 event body: {}", e))),
            Some(body) => Ok(body.clone().into_bytes()),
        }
    }

    fn into_request(self) -> Result<Request<Body>> {
        let body = self.decoded_body()?;
        let mut builder = Request::builder()
            .method(self.http_method.as_str())
            .uri(TRANSFORM_PATH);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body(Body::from(body))
            .map_err(|e| Error::Generic(format!("Invalid function event: {}", e)))
    }
}

/// Handles one invocation and always produces a response object.
pub async fn handle_event(state: AppState, event: FunctionEvent) -> FunctionResponse {
    tracing::debug!("Handling {} function event", event.http_method);

    let request = match event.into_request() {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!("Rejected function event: {}", err);
            return FunctionResponse::from_error(err).await;
        }
    };

    match transform_router(state).oneshot(request).await {
        Ok(response) => FunctionResponse::from_response(response).await,
        Err(infallible) => match infallible {},
    }
}

impl FunctionResponse {
    async fn from_response(response: axum::response::Response) -> Self {
        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let body = match response.into_body().collect().await {
            Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
            Err(err) => {
                tracing::error!("Failed to read response body: {}", err);
                String::new()
            }
        };

        Self {
            status_code,
            headers,
            body,
        }
    }

    async fn from_error(err: Error) -> Self {
        use axum::response::IntoResponse;

        let mut response = Self::from_response(err.into_response()).await;
        response
            .headers
            .insert("access-control-allow-origin".to_string(), "*".to_string());
        response
    }
}
