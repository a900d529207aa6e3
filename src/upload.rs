//! Buffers the uploaded photo out of a multipart body.

use crate::ai::mime::resolve_upload_mime;
use crate::models::UploadedImage;
use crate::{Error, Result};
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

/// Largest accepted image, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Extra room allowed on the whole request body for multipart framing.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Name of the form field carrying the photo.
pub const IMAGE_FIELD: &str = "image";

/// Reads the first `image` field fully into memory.
///
/// Other fields are skipped. The limit is checked while buffering so an
/// oversized file is rejected before it is fully read.
pub async fn receive_upload(mut multipart: Multipart, limit: usize) -> Result<UploadedImage> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let declared = field.content_type().map(str::to_string);
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > limit {
                tracing::info!(
                    "Rejected upload larger than {} bytes ({} buffered so far)",
                    limit,
                    bytes.len()
                );
                return Err(Error::PayloadTooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(Error::NoFileProvided);
        }

        let mime_type = resolve_upload_mime(declared.as_deref(), &bytes);
        tracing::debug!("Buffered upload ({} bytes, {})", bytes.len(), mime_type);
        return Ok(UploadedImage::new(bytes, mime_type));
    }

    Err(Error::NoFileProvided)
}

fn multipart_error(err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge {
            limit: MAX_UPLOAD_BYTES,
        }
    } else {
        Error::Multipart(err.body_text())
    }
}
