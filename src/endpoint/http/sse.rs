//! Server-Sent Events (SSE) parser.
//!
//! Follows the SSE event-stream format for parsing text/event-stream bodies.

/// A parsed SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type (from `event:` line), if present.
    pub event: Option<String>,
    /// Event data (from `data:` lines).
    pub data: String,
    /// Last event id (from `id:` line), if present.
    pub id: Option<String>,
}

/// Incremental SSE parser.
///
/// Buffers partial data and emits complete events.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence from the last chunk.
    utf8_tail: Vec<u8>,
    /// Offset into `buffer` already searched for an event boundary.
    scanned: usize,
}

impl SseParser {
    /// Create a new SSE parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw body chunk and return any complete events.
    ///
    /// A multi-byte character split across chunks is held back until the
    /// rest of it arrives. Invalid sequences are replaced with U+FFFD.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut bytes = std::mem::take(&mut self.utf8_tail);
        bytes.extend_from_slice(chunk);

        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => text.to_string(),
            Err(e) if e.error_len().is_none() => {
                let (valid, tail) = bytes.split_at(e.valid_up_to());
                self.utf8_tail = tail.to_vec();
                String::from_utf8_lossy(valid).into_owned()
            }
            Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
        };

        self.feed(&text)
    }

    /// Feed a chunk of text and return any complete events.
    ///
    /// SSE events are delimited by a blank line. `\r\n` line endings are
    /// normalized to `\n`. Each event can have:
    /// - `event: <type>` - optional event type
    /// - `data: <content>` - event data (required, may repeat)
    /// - `id: <id>` - optional event id
    pub fn feed(&mut self, chunk: &str) -> Vec<SseEvent> {
        // A CRLF split across chunks leaves a bare `\r` at the end of the buffer
        let chunk = match chunk.strip_prefix('\n') {
            Some(_) if self.buffer.ends_with('\r') => {
                self.buffer.pop();
                self.scanned = self.scanned.min(self.resume_offset());
                chunk
            }
            _ => chunk,
        };
        if chunk.contains("\r\n") {
            self.buffer.push_str(&chunk.replace("\r\n", "\n"));
        } else {
            self.buffer.push_str(chunk);
        }

        let mut events = Vec::new();
        while let Some(offset) = self.buffer[self.scanned..].find("\n\n") {
            let pos = self.scanned + offset;
            let event_text: String = self.buffer.drain(..pos + 2).collect();
            self.scanned = 0;

            if let Some(event) = Self::parse_event(&event_text[..pos]) {
                events.push(event);
            }
        }

        self.scanned = self.resume_offset();
        events
    }

    /// Where the next boundary search starts. A trailing `\n` stays in range
    /// so a blank line split across chunks is still found.
    fn resume_offset(&self) -> usize {
        if self.buffer.ends_with('\n') {
            self.buffer.len() - 1
        } else {
            self.buffer.len()
        }
    }

    /// Parse a single SSE event from its text representation.
    fn parse_event(text: &str) -> Option<SseEvent> {
        let mut event_type = None;
        let mut id = None;
        let mut data_parts = Vec::new();

        for line in text.lines() {
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = line.split_once(':').unwrap_or((line, ""));
            let value = value.strip_prefix(' ').unwrap_or(value);

            match field {
                "event" => event_type = Some(value.to_string()),
                "data" => data_parts.push(value.to_string()),
                "id" => id = Some(value.to_string()),
                _ => {}
            }
        }

        if data_parts.is_empty() {
            return None;
        }

        Some(SseEvent {
            event: event_type,
            data: data_parts.join("\n"),
            id,
        })
    }

    /// Check if there's pending data in the buffer.
    pub fn has_pending(&self) -> bool {
        !self.buffer.trim().is_empty() || !self.utf8_tail.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_event() {
        let mut parser = SseParser::new();
        let events = parser.feed("data: hello world\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "hello world");
        assert!(events[0].event.is_none());
    }

    #[test]
    fn test_event_with_type_and_id() {
        let mut parser = SseParser::new();
        let events = parser.feed("event: audio\nid: 7\ndata: {\"chunk\": \"UklGR\"}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.as_deref(), Some("audio"));
        assert_eq!(events[0].id.as_deref(), Some("7"));
        assert_eq!(events[0].data, "{\"chunk\": \"UklGR\"}");
    }

    #[test]
    fn test_multiple_events() {
        let mut parser = SseParser::new();
        let events = parser.feed("data: first\n\ndata: second\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "first");
        assert_eq!(events[1].data, "second");
    }

    #[test]
    fn test_partial_event() {
        let mut parser = SseParser::new();

        let events = parser.feed("data: partial");
        assert!(events.is_empty());
        assert!(parser.has_pending());

        let events = parser.feed(" message\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "partial message");
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed("data: a\r\n\r").is_empty());
        let events = parser.feed("\ndata: b\r\n\r\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "a");
        assert_eq!(events[1].data, "b");
    }

    #[test]
    fn test_boundary_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed("data: a\n").is_empty());
        let events = parser.feed("\ndata: b\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "a");
        assert_eq!(events[1].data, "b");
    }

    #[test]
    fn test_large_event_scanned_incrementally() {
        let mut parser = SseParser::new();
        assert!(parser.feed("event: audio\ndata: ").is_empty());

        for _ in 0..500 {
            assert!(parser.feed("UklGRiQAAABXQVZF").is_empty());
            // Already-searched text is not searched again
            assert_eq!(parser.scanned, parser.buffer.len());
        }

        let events = parser.feed("\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data.len(), 500 * 16);
        assert_eq!(parser.scanned, 0);
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_multiline_data() {
        let mut parser = SseParser::new();
        let events = parser.feed("data: line1\ndata: line2\ndata: line3\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "line1\nline2\nline3");
    }

    #[test]
    fn test_only_one_leading_space_stripped() {
        let mut parser = SseParser::new();
        let events = parser.feed("data:   indented\n\n");
        assert_eq!(events[0].data, "  indented");
    }

    #[test]
    fn test_event_field_keeps_spacing() {
        let mut parser = SseParser::new();
        let events = parser.feed("event:audio\ndata: a\n\nevent:  padded \ndata: b\n\n");
        assert_eq!(events[0].event.as_deref(), Some("audio"));
        assert_eq!(events[1].event.as_deref(), Some(" padded "));
    }

    #[test]
    fn test_comment_ignored() {
        let mut parser = SseParser::new();
        let events = parser.feed(": keep-alive\ndata: actual data\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "actual data");
    }

    #[test]
    fn test_block_without_data_not_dispatched() {
        let mut parser = SseParser::new();
        assert!(parser.feed(": ping\n\nevent: noop\n\n").is_empty());
    }

    #[test]
    fn test_empty_data_line() {
        let mut parser = SseParser::new();
        let events = parser.feed("data:\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "");
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let mut parser = SseParser::new();
        let bytes = "data: héllo\n\n".as_bytes();
        // Split inside the two-byte 'é'
        let split = "data: h".len() + 1;

        assert!(parser.feed_bytes(&bytes[..split]).is_empty());
        assert!(parser.has_pending());
        let events = parser.feed_bytes(&bytes[split..]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "héllo");
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let mut parser = SseParser::new();
        let events = parser.feed_bytes(b"data: a\xffb\n\n");
        assert_eq!(events[0].data, "a\u{fffd}b");
    }
}
