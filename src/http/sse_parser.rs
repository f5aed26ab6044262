//! SSE (Server-Sent Events) decoding for streamed chat responses.
//!
//! The chat-response endpoint streams lines of the form `data: {json}` and
//! ends the stream with an `event: done` line. Each `data:` payload becomes
//! one [`ChatMessage`]; everything after the sentinel is ignored.

use super::error_helpers::{classify_reqwest_error, format_json_parse_error};
use super::loud_wire;
use crate::errors::LiveHintError;
use crate::types::ChatMessage;
use async_stream::try_stream;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "event: done";

/// Incremental line decoder for an SSE body.
///
/// Bytes can arrive in arbitrary chunks; lines split across chunks are
/// buffered until their newline shows up. Once the `event: done` sentinel
/// is seen the decoder ignores all further input.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
    request_id: Option<usize>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags wire-debug output with a request id.
    #[must_use]
    pub(crate) const fn with_request_id(mut self, request_id: usize) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Returns `true` once the sentinel line has been seen.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Feeds a chunk of bytes and returns the messages completed by it, in
    /// arrival order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<ChatMessage> {
        let mut messages = Vec::new();
        if self.done {
            return messages;
        }

        self.buffer.extend_from_slice(chunk);
        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            self.handle_line(&line, &mut messages);
            if self.done {
                self.buffer.clear();
                break;
            }
        }
        messages
    }

    /// Processes a final line that was not newline-terminated.
    pub fn finish(&mut self) -> Vec<ChatMessage> {
        let mut messages = Vec::new();
        if !self.done && !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.handle_line(&line, &mut messages);
        }
        messages
    }

    fn handle_line(&mut self, raw: &[u8], out: &mut Vec<ChatMessage>) {
        let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            return;
        }

        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                warn!("Skipping SSE line with invalid UTF-8: {e}");
                return;
            }
        };

        if let Some(request_id) = self.request_id {
            loud_wire::log_sse_line(request_id, line);
        }

        if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
            let payload = payload.trim();
            match serde_json::from_str::<ChatMessage>(payload) {
                Ok(message) => out.push(message),
                Err(e) => warn!(
                    "Skipping malformed SSE data line: {}",
                    format_json_parse_error(payload, &e)
                ),
            }
        } else if line.trim() == DONE_SENTINEL {
            debug!("SSE stream reached done sentinel");
            self.done = true;
        }
    }
}

/// Decodes a fully received SSE body into its chat messages.
///
/// Malformed `data:` lines are skipped; decoding stops at `event: done`.
#[must_use]
pub fn decode_event_stream(body: &[u8]) -> Vec<ChatMessage> {
    let mut decoder = SseDecoder::new();
    let mut messages = decoder.push(body);
    messages.extend(decoder.finish());
    messages
}

/// Parses an SSE byte stream into a stream of chat messages.
///
/// Stops pulling from `byte_stream` as soon as the done sentinel arrives, so
/// the rest of the body is never read. Transport failures while reading the
/// body are classified like any other request failure.
pub fn parse_sse_stream<'a>(
    byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'a,
    label: &'a str,
    request_id: usize,
) -> impl Stream<Item = Result<ChatMessage, LiveHintError>> + Send + 'a {
    try_stream! {
        futures_util::pin_mut!(byte_stream);
        let mut decoder = SseDecoder::new().with_request_id(request_id);

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = chunk_result.map_err(|e| classify_reqwest_error(e, label, None))?;
            for message in decoder.push(&chunk) {
                yield message;
            }
            if decoder.is_done() {
                break;
            }
        }

        for message in decoder.finish() {
            yield message;
        }
    }
}
