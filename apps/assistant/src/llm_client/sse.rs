//! Server-sent event decoding for streamed chat completions.
//!
//! The body arrives as arbitrary byte chunks; lines are only decoded once the
//! terminating `\n` has been seen, so multi-byte characters split across
//! chunks survive intact.

use serde::Deserialize;

/// Terminator payload sent by OpenAI-compatible servers.
const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feeds raw bytes and returns the `data:` payload of every completed line.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(payload) = data_payload(&line) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Flushes a final line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        data_payload(&rest)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let rest = line.strip_prefix("data:")?;
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Text carried by one chunk; may be empty for role-only or finish chunks.
    Delta(String),
    Done,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// Interprets one `data:` payload of a chat completion stream.
pub fn decode_event(payload: &str) -> Result<StreamEvent, serde_json::Error> {
    let payload = payload.trim();
    if payload == DONE_MARKER {
        return Ok(StreamEvent::Done);
    }

    let chunk: ChatChunk = serde_json::from_str(payload)?;
    let text = chunk
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .collect::<String>();
    Ok(StreamEvent::Delta(text))
}
