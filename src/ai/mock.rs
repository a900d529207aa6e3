use super::{ChunkStream, HeadshotGenerator};
use crate::models::{GenerationRequest, StreamChunk};
use crate::{Error, Result};
use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use std::sync::{Arc, Mutex};

/// Scripted generator that replays chunks and records how many were pulled.
pub struct MockHeadshotGenerator {
    chunks: Vec<StreamChunk>,
    has_credential: bool,
    fail_with: Option<String>,
    pull_limit: Option<usize>,
    pulled: Arc<Mutex<usize>>,
    call_count: Arc<Mutex<usize>>,
    last_request: Arc<Mutex<Option<GenerationRequest>>>,
}

impl MockHeadshotGenerator {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            has_credential: true,
            fail_with: None,
            pull_limit: None,
            pulled: Arc::new(Mutex::new(0)),
            call_count: Arc::new(Mutex::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_chunk(mut self, chunk: StreamChunk) -> Self {
        self.chunks.push(chunk);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_chunk(StreamChunk::Text(text.to_string()))
    }

    pub fn with_image(self, data: Vec<u8>, mime_type: Option<&str>) -> Self {
        self.with_chunk(StreamChunk::Image {
            data,
            mime_type: mime_type.map(str::to_string),
        })
    }

    pub fn without_credential(mut self) -> Self {
        self.has_credential = false;
        self
    }

    /// Makes `open_stream` fail as if the backend rejected the call.
    pub fn failing_with(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    /// Pulling more than `limit` chunks yields an error instead of a chunk.
    pub fn with_pull_limit(mut self, limit: usize) -> Self {
        self.pull_limit = Some(limit);
        self
    }

    pub fn pulled_chunks(&self) -> usize {
        *self.pulled.lock().unwrap()
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockHeadshotGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HeadshotGenerator for MockHeadshotGenerator {
    fn check_credential(&self) -> Result<()> {
        if self.has_credential {
            Ok(())
        } else {
            Err(Error::MissingCredential)
        }
    }

    async fn open_stream(&self, request: &GenerationRequest) -> Result<ChunkStream> {
        self.check_credential()?;
        *self.call_count.lock().unwrap() += 1;
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(message) = &self.fail_with {
            return Err(Error::BackendUnavailable(message.clone()));
        }

        let pulled = Arc::clone(&self.pulled);
        let limit = self.pull_limit;
        let chunks = self.chunks.clone();

        Ok(stream::iter(chunks)
            .map(move |chunk| {
                let mut count = pulled.lock().unwrap();
                *count += 1;
                match limit {
                    Some(limit) if *count > limit => Err(Error::Generic(format!(
                        "pulled {} chunks, limit is {}",
                        *count, limit
                    ))),
                    _ => Ok(chunk),
                }
            })
            .boxed())
    }
}
