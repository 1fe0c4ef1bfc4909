//! Server-Sent Events (SSE) parser for Gemini responses

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::GenerateContentResponse;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Parse a stream of bytes as Gemini SSE events
///
/// Gemini sends one `data: <json>` line per chunk. Bytes are buffered until a
/// full line is available, so both JSON payloads and multi-byte UTF-8
/// characters may be split across network chunks. Other SSE fields
/// (`event:`, `id:`, comments) are ignored.
pub fn parse_sse_stream(
    byte_stream: ByteStream,
) -> Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, LlmError>> + Send>> {
    let mut buffer: Vec<u8> = Vec::new();

    let event_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(e.to_string()))]);
            }
        };

        buffer.extend_from_slice(&chunk);

        let mut events = Vec::new();
        while let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = buffer.drain(..=newline_pos).collect();
            let line = match std::str::from_utf8(&raw) {
                Ok(line) => line.trim(),
                Err(e) => {
                    events.push(Err(LlmError::StreamError(format!(
                        "Invalid UTF-8 in stream: {}",
                        e
                    ))));
                    continue;
                }
            };

            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim_start();
                match serde_json::from_str::<GenerateContentResponse>(data) {
                    Ok(response) => events.push(Ok(response)),
                    Err(e) => events.push(Err(LlmError::SerializationError(format!(
                        "Failed to parse SSE data: {}. Data: {}",
                        e, data
                    )))),
                }
            }
        }

        futures::stream::iter(events)
    });

    Box::pin(event_stream)
}
