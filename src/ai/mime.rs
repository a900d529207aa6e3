const OCTET_STREAM: &str = "application/octet-stream";

pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to image/png",
                &bytes[..bytes.len().min(4)]
            );
            "image/png"
        }
    }
}

/// Prefer the MIME type the client declared, sniffing only when it is
/// missing or generic.
pub fn resolve_upload_mime(declared: Option<&str>, bytes: &[u8]) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() && !mime.eq_ignore_ascii_case(OCTET_STREAM) => {
            mime.to_string()
        }
        _ => detect_image_mime(bytes).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(
            detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            "image/png"
        );
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    }

    #[test]
    fn test_detect_webp() {
        assert_eq!(
            detect_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            "image/webp"
        );
    }

    #[test]
    fn test_detect_gif() {
        assert_eq!(detect_image_mime(b"GIF89a"), "image/gif");
    }

    #[test]
    fn test_empty_falls_back_to_png() {
        assert_eq!(detect_image_mime(&[]), "image/png");
    }

    #[test]
    fn test_declared_mime_wins() {
        assert_eq!(
            resolve_upload_mime(Some("image/heic"), &[0xFF, 0xD8, 0xFF]),
            "image/heic"
        );
    }

    #[test]
    fn test_octet_stream_is_sniffed() {
        assert_eq!(
            resolve_upload_mime(Some("application/octet-stream"), &[0xFF, 0xD8, 0xFF]),
            "image/jpeg"
        );
        assert_eq!(resolve_upload_mime(None, &[0x89, 0x50, 0x4E, 0x47]), "image/png");
    }
}
