//! HTTP surface for the long-running server.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header::CONTENT_TYPE, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::ai::HeadshotGenerator;
use crate::models::{GenerationOutcome, GenerationRequest};
use crate::reconcile::reconcile;
use crate::response::{encode_outcome, TransformBody};
use crate::upload::{receive_upload, MAX_UPLOAD_BYTES, MULTIPART_OVERHEAD_BYTES};
use crate::{Error, Result};

pub const TRANSFORM_PATH: &str = "/transform-headshot";

#[derive(Clone)]
pub struct AppState {
    generator: Arc<dyn HeadshotGenerator>,
    upload_limit: usize,
}

impl AppState {
    pub fn new(generator: Arc<dyn HeadshotGenerator>) -> Self {
        Self {
            generator,
            upload_limit: MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_upload_limit(mut self, upload_limit: usize) -> Self {
        self.upload_limit = upload_limit;
        self
    }
}

async fn transform_headshot_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    match transform(&state, multipart).await {
        Ok(outcome) => encode_outcome(&outcome).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Runs the whole pipeline for one request.
///
/// The credential is checked before the body is read, so a misconfigured
/// server answers 500 whether or not a file was sent.
async fn transform(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<GenerationOutcome> {
    state.generator.check_credential()?;

    let multipart = multipart.map_err(|rejection| {
        info!("Request body is not multipart: {}", rejection.body_text());
        Error::NoFileProvided
    })?;
    let image = receive_upload(multipart, state.upload_limit).await?;
    info!(
        "Transforming uploaded image ({} bytes, {})",
        image.bytes.len(),
        image.mime_type
    );

    let request = GenerationRequest::new(image);
    let chunks = state.generator.open_stream(&request).await?;
    reconcile(chunks).await
}

async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed_handler() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        TransformBody::error_only("Method not allowed".to_string()),
    )
        .into_response()
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Server is running" }))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

/// Routes shared by both deployment shapes.
pub fn transform_router(state: AppState) -> Router {
    let body_limit = state.upload_limit + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route(
            TRANSFORM_PATH,
            post(transform_headshot_handler)
                .options(preflight_handler)
                .fallback(method_not_allowed_handler),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer())
        .with_state(state)
}

/// Full server router: transform routes, health check and optional static
/// assets.
pub fn create_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = transform_router(state).route(
        "/health",
        get(health_handler).layer(cors_layer()),
    );

    let router = match static_dir {
        Some(dir) if dir.is_dir() => {
            info!("Serving static assets from {}", dir.display());
            router.fallback_service(ServeDir::new(dir))
        }
        Some(dir) => {
            info!("Static directory {} not found, skipping", dir.display());
            router
        }
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

pub async fn setup_server(
    listen_addr: &str,
    port: u16,
    state: AppState,
    static_dir: Option<PathBuf>,
) -> std::result::Result<(), anyhow::Error> {
    let app = create_router(state, static_dir);

    let listener = tokio::net::TcpListener::bind((listen_addr, port)).await?;
    info!("Server running on http://{}", listener.local_addr()?);
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", err);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
