//! Incremental decoder for the daemon's SSE wire format.
//!
//! The feed transport hands us raw byte chunks with no alignment
//! guarantees; a frame boundary can fall anywhere. The decoder buffers
//! partial lines across chunks and emits one `SseFrame` per dispatched
//! event (blank-line terminated, per the SSE format).

use crate::error::{FeedError, FeedResult};

/// One decoded feed frame: the channel name and its raw data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name from the `event:` field ("message" if none was sent).
    pub event: String,
    /// Concatenated `data:` lines, joined with newlines.
    pub data: String,
}

/// Incremental SSE decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current incomplete line.
    buf: Vec<u8>,
    /// `event:` field of the frame being assembled.
    event: Option<String>,
    /// `data:` lines of the frame being assembled.
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every frame completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> FeedResult<Vec<SseFrame>> {
        let mut frames = Vec::new();

        for &byte in chunk {
            if byte != b'\n' {
                self.buf.push(byte);
                continue;
            }

            let mut line = std::mem::take(&mut self.buf);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = std::str::from_utf8(&line)?;

            if line.is_empty() {
                if let Some(frame) = self.dispatch() {
                    frames.push(frame);
                }
            } else {
                self.field(line);
            }
        }

        Ok(frames)
    }

    /// Process one non-empty line as an SSE field.
    fn field(&mut self, line: &str) {
        // Lines starting with ':' are comments (used as keep-alives).
        if line.starts_with(':') {
            return;
        }

        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match name {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // "id" and "retry" are transport concerns we do not track.
            _ => {}
        }
    }

    /// Dispatch the frame assembled so far, if it carries any data.
    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        let data = std::mem::take(&mut self.data);

        if data.is_empty() {
            return None;
        }

        Some(SseFrame {
            event: event.unwrap_or_else(|| "message".to_string()),
            data: data.join("\n"),
        })
    }
}
