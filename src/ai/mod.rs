//! Generative backend integration
//!
//! Defines the streaming generation seam and its Gemini implementation.
//! Handlers only see [`HeadshotGenerator`], so tests can swap in
//! [`MockHeadshotGenerator`].

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiImageClient;
pub use mock::MockHeadshotGenerator;

use crate::models::{GenerationRequest, StreamChunk};
use crate::Result;
use async_trait::async_trait;
use futures_util::stream::BoxStream;

/// Lazily pulled, non-restartable sequence of backend chunks.
pub type ChunkStream = BoxStream<'static, Result<StreamChunk>>;

#[async_trait]
pub trait HeadshotGenerator: Send + Sync {
    /// Fails with `MissingCredential` when no API key is configured.
    fn check_credential(&self) -> Result<()>;

    /// Opens the streaming generation call for one request.
    async fn open_stream(&self, request: &GenerationRequest) -> Result<ChunkStream>;
}
