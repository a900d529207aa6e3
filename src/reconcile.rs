//! Reduces a streamed generation response to a single outcome.

use crate::models::{GenerationOutcome, StreamChunk, DEFAULT_OUTPUT_MIME};
use crate::{Error, Result};
use futures_util::{Stream, StreamExt};

/// Pulls chunks until the first image or the end of the stream.
///
/// Text is accumulated across chunks. Once an image arrives nothing further is
/// pulled, so trailing chunks are never requested from the backend.
pub async fn reconcile<S>(mut chunks: S) -> Result<GenerationOutcome>
where
    S: Stream<Item = Result<StreamChunk>> + Unpin,
{
    let mut text = String::new();
    let mut seen = 0usize;

    while let Some(chunk) = chunks.next().await {
        seen += 1;
        match chunk? {
            StreamChunk::Image { data, mime_type } => {
                let mime_type = mime_type
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_OUTPUT_MIME.to_string());
                tracing::info!(
                    "Received image from chunk {} ({} bytes, {})",
                    seen,
                    data.len(),
                    mime_type
                );
                return Ok(GenerationOutcome::Success {
                    image: data,
                    mime_type,
                });
            }
            StreamChunk::Text(fragment) => {
                tracing::debug!("Chunk {} carried {} bytes of text", seen, fragment.len());
                text.push_str(&fragment);
            }
            StreamChunk::Empty => {
                tracing::debug!("Chunk {} carried no content, skipping", seen);
            }
        }
    }

    if text.is_empty() {
        tracing::warn!("Stream ended after {} chunks without image or text", seen);
        Ok(GenerationOutcome::HardFailure {
            reason: Error::NoUsableOutput.to_string(),
        })
    } else {
        tracing::warn!("Stream ended after {} chunks with text only", seen);
        Ok(GenerationOutcome::SoftFailure { text })
    }
}
