//! Turns a streaming HTTP body into a lazy [`ChunkStream`].

use super::sse::SseDecoder;
use super::types::GenerateContentResponse;
use crate::ai::ChunkStream;
use crate::models::StreamChunk;
use crate::{Error, Result};
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{stream, StreamExt};
use std::collections::VecDeque;

type ByteStream = BoxStream<'static, reqwest::Result<Bytes>>;

struct ChunkReader {
    body: ByteStream,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

impl ChunkReader {
    /// Pulls body bytes only until one more event is available.
    async fn next_chunk(&mut self) -> Option<Result<StreamChunk>> {
        loop {
            if let Some(data) = self.pending.pop_front() {
                return Some(parse_event(&data));
            }
            if self.finished {
                return None;
            }
            match self.body.next().await {
                Some(Ok(bytes)) => self.pending.extend(self.decoder.push(&bytes)),
                Some(Err(e)) => {
                    self.finished = true;
                    tracing::error!("Gemini stream interrupted: {}", e);
                    return Some(Err(Error::BackendUnavailable(e.to_string())));
                }
                None => {
                    self.finished = true;
                    self.pending.extend(self.decoder.finish());
                }
            }
        }
    }
}

pub fn chunk_stream(response: reqwest::Response) -> ChunkStream {
    from_bytes(response.bytes_stream().boxed())
}

pub(crate) fn from_bytes(body: ByteStream) -> ChunkStream {
    let reader = ChunkReader {
        body,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(reader, |mut reader| async move {
        reader.next_chunk().await.map(|item| (item, reader))
    })
    .boxed()
}

fn parse_event(data: &str) -> Result<StreamChunk> {
    match serde_json::from_str::<GenerateContentResponse>(data) {
        Ok(response) => {
            if let Some(error) = response.error {
                tracing::error!(
                    "Gemini reported an error mid-stream ({} {}): {}",
                    error.code,
                    error.status,
                    error.message
                );
                return Err(Error::BackendUnavailable(format!(
                    "Gemini API error ({}): {}",
                    error.code, error.message
                )));
            }
            Ok(response.into_chunk())
        }
        Err(e) => {
            tracing::warn!("Skipping malformed Gemini chunk: {}", e);
            Ok(StreamChunk::Empty)
        }
    }
}
