//! Decoding for the backend's simplified Server-Sent-Events protocol.
//!
//! The stream endpoints emit line-delimited frames. Only lines carrying the
//! literal `data: ` prefix are meaningful; the remainder of such a line is a
//! JSON-encoded event object discriminated by its `type` field. Blank lines
//! separate frames and everything else on the wire is noise to be skipped.
//! There is no `event:`/`id:`/`retry:` machinery in this variant.
//!
//! Decoding happens in three steps, each its own small piece:
//! bytes → lines ([`LineBuffer`]), line → frame ([`parse_frame_line`]),
//! frame payload → event ([`decode_event`]).

use serde::Deserialize;

use crate::models::SourceReference;

/// Classification of one line of the streamed response.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameLine {
    /// A `data: ` line; carries the JSON payload with the prefix stripped.
    Data(String),
    /// A frame separator.
    Blank,
    /// Anything else. Ignored per protocol.
    Other,
}

/// Classify a single line.
///
/// The prefix match is exact (`"data: "`, with the space); a bare `data:`
/// line or a different field name is noise in this protocol variant.
pub fn parse_frame_line(line: &str) -> FrameLine {
    if line.is_empty() {
        return FrameLine::Blank;
    }
    match line.strip_prefix("data: ") {
        Some(payload) if !payload.trim().is_empty() => FrameLine::Data(payload.to_string()),
        Some(_) => FrameLine::Blank,
        None => FrameLine::Other,
    }
}

/// A decoded stream event.
///
/// Unknown `type` tags decode to [`StreamEvent::Unknown`] rather than
/// failing, so the backend can introduce event kinds without breaking
/// deployed clients. That rule is policy, not an accident: the consumer
/// drops `Unknown` silently.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Stream opened; may carry the conversation id assigned by the backend.
    Start {
        #[serde(default)]
        conversation_id: Option<String>,
    },
    /// One answer text delta. An empty string is a legal no-op delta.
    Text {
        #[serde(default)]
        content: String,
    },
    /// One retrieval citation.
    Source { source: SourceReference },
    /// Normal termination.
    Done,
    /// Backend-reported failure; terminal.
    Error {
        #[serde(default)]
        error: Option<String>,
    },
    /// Any event kind this client does not know.
    #[serde(other)]
    Unknown,
}

/// Decode a frame payload into a typed event.
///
/// A payload that is not valid JSON (or not an object with a usable shape)
/// is a malformed frame; the caller skips it and keeps reading.
pub fn decode_event(payload: &str) -> Result<StreamEvent, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Reassembles complete lines from arbitrarily-split transport chunks.
///
/// Chunk boundaries can fall anywhere, including inside a multi-byte UTF-8
/// sequence, so bytes are buffered and only converted once a full line is
/// available. Trailing `\r` is stripped to tolerate CRLF framing.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk; returns every line it completed.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop(); // the newline itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Drain whatever remains after the transport closed without a final
    /// newline. Returns `None` when the buffer is empty.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.pending);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // parse_frame_line

    #[test]
    fn empty_line_is_blank() {
        assert_eq!(parse_frame_line(""), FrameLine::Blank);
    }

    #[test]
    fn data_line_strips_prefix() {
        assert_eq!(
            parse_frame_line(r#"data: {"type":"done"}"#),
            FrameLine::Data(r#"{"type":"done"}"#.to_string())
        );
    }

    #[test]
    fn data_line_with_blank_payload_is_blank() {
        assert_eq!(parse_frame_line("data:  "), FrameLine::Blank);
        assert_eq!(parse_frame_line("data: "), FrameLine::Blank);
    }

    #[test]
    fn non_data_lines_are_noise() {
        assert_eq!(parse_frame_line("event: text"), FrameLine::Other);
        assert_eq!(parse_frame_line(": keep-alive"), FrameLine::Other);
        assert_eq!(parse_frame_line("id: 7"), FrameLine::Other);
        // Missing the space after the colon.
        assert_eq!(parse_frame_line(r#"data:{"type":"done"}"#), FrameLine::Other);
    }

    // decode_event

    #[test]
    fn decode_start_with_conversation() {
        let event = decode_event(r#"{"type":"start","conversation_id":"c1"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Start {
                conversation_id: Some("c1".to_string())
            }
        );
    }

    #[test]
    fn decode_start_without_conversation() {
        let event = decode_event(r#"{"type":"start"}"#).unwrap();
        assert_eq!(event, StreamEvent::Start { conversation_id: None });
    }

    #[test]
    fn decode_text() {
        let event = decode_event(r#"{"type":"text","content":"Hi"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Text {
                content: "Hi".to_string()
            }
        );
    }

    #[test]
    fn decode_text_with_missing_content_defaults_empty() {
        let event = decode_event(r#"{"type":"text"}"#).unwrap();
        assert_eq!(event, StreamEvent::Text { content: String::new() });
    }

    #[test]
    fn decode_source() {
        let event = decode_event(
            r#"{"type":"source","source":{"source_id":"s1","doc_id":"d1","content":"c","score":0.9}}"#,
        )
        .unwrap();
        match event {
            StreamEvent::Source { source } => {
                assert_eq!(source.source_id, "s1");
                assert_eq!(source.doc_id, "d1");
            }
            other => panic!("expected Source, got {other:?}"),
        }
    }

    #[test]
    fn decode_done_and_error() {
        assert_eq!(decode_event(r#"{"type":"done"}"#).unwrap(), StreamEvent::Done);
        assert_eq!(
            decode_event(r#"{"type":"error","error":"boom"}"#).unwrap(),
            StreamEvent::Error {
                error: Some("boom".to_string())
            }
        );
        assert_eq!(
            decode_event(r#"{"type":"error"}"#).unwrap(),
            StreamEvent::Error { error: None }
        );
    }

    #[test]
    fn decode_done_with_extra_fields() {
        // The backend sends {"type":"done","done":true}; extras are ignored.
        assert_eq!(
            decode_event(r#"{"type":"done","done":true}"#).unwrap(),
            StreamEvent::Done
        );
    }

    #[test]
    fn decode_unknown_tag_is_unknown() {
        assert_eq!(
            decode_event(r#"{"type":"heartbeat","ts":123}"#).unwrap(),
            StreamEvent::Unknown
        );
    }

    #[test]
    fn decode_invalid_json_errors() {
        assert!(decode_event("{not json").is_err());
        assert!(decode_event(r#"{"content":"no type"}"#).is_err());
    }

    #[test]
    fn decode_source_without_payload_errors() {
        // A source frame with the nested object missing is malformed.
        assert!(decode_event(r#"{"type":"source"}"#).is_err());
    }

    // LineBuffer

    #[test]
    fn whole_lines_come_out_as_fed() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.push_chunk(b"data: a\ndata: b\n");
        assert_eq!(lines, vec!["data: a".to_string(), "data: b".to_string()]);
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn partial_line_held_until_newline() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push_chunk(b"data: {\"type\":").is_empty());
        let lines = buffer.push_chunk(b"\"done\"}\n");
        assert_eq!(lines, vec!["data: {\"type\":\"done\"}".to_string()]);
    }

    #[test]
    fn crlf_is_stripped() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.push_chunk(b"data: a\r\n\r\n");
        assert_eq!(lines, vec!["data: a".to_string(), String::new()]);
    }

    #[test]
    fn utf8_split_across_chunks_survives() {
        let text = "data: {\"type\":\"text\",\"content\":\"héllo\"}\n";
        let bytes = text.as_bytes();
        // Split inside the two-byte 'é' sequence.
        let split = text.find('é').unwrap() + 1;

        let mut buffer = LineBuffer::new();
        assert!(buffer.push_chunk(&bytes[..split]).is_empty());
        let lines = buffer.push_chunk(&bytes[split..]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("héllo"));
    }

    #[test]
    fn finish_flushes_unterminated_tail() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push_chunk(b"data: {\"type\":\"done\"}").is_empty());
        assert_eq!(buffer.finish(), Some("data: {\"type\":\"done\"}".to_string()));
        assert!(buffer.finish().is_none());
    }
}
