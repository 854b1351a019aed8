use super::logging::emit_sse_parse_error;
use crate::types::{EmailContext, ToolCall};
use anyhow::Result;
use bytes::{BufMut, BytesMut};

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    ToolCall(ToolCall),
    Email(EmailContext),
}

/// Incremental parser for the orchestrator's server-sent event stream.
///
/// Chunks are buffered as raw bytes and only complete frames are decoded, so
/// a multi-byte character split across two network reads survives intact.
#[derive(Default)]
pub struct StreamParser {
    buffer: BytesMut,
}

impl StreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>> {
        self.buffer.extend_from_slice(chunk);
        if self.buffer.contains(&b'\r') {
            self.normalize_line_endings();
        }

        let mut events = Vec::new();
        while let Some(end) = frame_end(&self.buffer) {
            let frame = self.buffer.split_to(end + 2);
            match std::str::from_utf8(&frame) {
                Ok(text) => events.extend(parse_frame(text)),
                Err(error) => tracing::warn!(%error, "sse frame is not valid utf-8; skipped"),
            }
        }
        Ok(events)
    }

    /// Whatever is left after the stream ends, decoded lossily.
    pub fn flush(&mut self) -> String {
        String::from_utf8_lossy(&self.buffer.split()).into_owned()
    }

    /// A trailing `\r` stays put until its `\n` arrives with the next chunk.
    fn normalize_line_endings(&mut self) {
        let mut normalized = BytesMut::with_capacity(self.buffer.len());
        let mut bytes = self.buffer.iter().copied().peekable();
        while let Some(byte) = bytes.next() {
            if byte == b'\r' && bytes.peek() == Some(&b'\n') {
                continue;
            }
            normalized.put_u8(byte);
        }
        self.buffer = normalized;
    }
}

fn frame_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|pair| pair == b"\n\n")
}

fn parse_frame(text: &str) -> Option<StreamEvent> {
    let mut event_type = None;
    let mut data_lines = Vec::new();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("event:") {
            event_type = Some(rest.trim());
        } else if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.trim());
        }
    }

    let event_type = event_type.filter(|_| !data_lines.is_empty())?;
    decode_event(event_type, &data_lines.join("\n"))
}

fn decode_event(event_type: &str, json_data: &str) -> Option<StreamEvent> {
    let decoded = match event_type {
        "tool_call" => serde_json::from_str::<ToolCall>(json_data).map(StreamEvent::ToolCall),
        "email" => serde_json::from_str::<EmailContext>(json_data).map(StreamEvent::Email),
        _ => return None,
    };
    match decoded {
        Ok(event) => Some(event),
        Err(error) => {
            emit_sse_parse_error(Some(event_type), json_data, &error);
            None
        }
    }
}
