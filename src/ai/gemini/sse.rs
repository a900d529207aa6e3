//! Incremental decoder for `alt=sse` response bodies.
//!
//! Only `data:` fields matter for Gemini; each blank-line-terminated event
//! yields its joined data lines.

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw body bytes, returning every event completed by them.
    ///
    /// Bytes are buffered until a newline so multi-byte characters split
    /// across network reads decode correctly.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            self.handle_line(line.trim_end_matches('\r'), &mut events);
        }

        events
    }

    /// Flushes a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Vec<String> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw).into_owned();
            self.handle_line(line.trim_end_matches('\r'), &mut events);
        }
        self.finish_event(&mut events);
        events
    }

    fn handle_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            self.finish_event(events);
            return;
        }
        if line.starts_with(':') {
            return;
        }
        if let Some(value) = line.strip_prefix("data:") {
            self.data_lines
                .push(value.strip_prefix(' ').unwrap_or(value).to_string());
        } else if line == "data" {
            self.data_lines.push(String::new());
        }
    }

    fn finish_event(&mut self, events: &mut Vec<String>) {
        if self.data_lines.is_empty() {
            return;
        }
        events.push(self.data_lines.join("\n"));
        self.data_lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_consecutive_events() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: {\"a\":1}\r\n\r\ndata: {\"b\":2}\n\n");
        assert_eq!(events, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn test_event_split_across_reads() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"te").is_empty());
        assert!(decoder.push(b"xt\":\"hi\"}\n").is_empty());
        assert_eq!(decoder.push(b"\n"), vec!["{\"text\":\"hi\"}"]);
    }

    #[test]
    fn test_multibyte_character_split_across_reads() {
        let mut decoder = SseDecoder::new();
        let payload = "data: café\n\n".as_bytes();
        let split = payload.iter().position(|b| *b == 0xC3).unwrap() + 1;
        assert!(decoder.push(&payload[..split]).is_empty());
        assert_eq!(decoder.push(&payload[split..]), vec!["café"]);
    }

    #[test]
    fn test_comments_and_other_fields_are_ignored() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\nevent: message\nid: 7\ndata: x\n\n");
        assert_eq!(events, vec!["x"]);
    }

    #[test]
    fn test_multiline_data_is_joined() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: first\ndata: second\n\n");
        assert_eq!(events, vec!["first\nsecond"]);
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), vec!["tail"]);
        assert!(decoder.finish().is_empty());
    }
}
