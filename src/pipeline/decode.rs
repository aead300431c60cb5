//! Streaming decoders (Bytes -> JSON Value)
//!
//! Framing only: these turn a chunked body into one JSON document per frame.
//! What a frame *means* is decided by [`super::event_map`].

use crate::pipeline::{Decoder, PipelineError};
use crate::{BoxStream, Error, PipeResult};
use bytes::Bytes;
use futures::{stream, StreamExt};
use serde_json::Value;

fn parse_json(raw: &str) -> PipeResult<Value> {
    serde_json::from_str(raw).map_err(|e| {
        Error::Decode(PipelineError::InvalidFrame {
            frame: raw.chars().take(200).collect(),
            error: e.to_string(),
        })
    })
}

fn utf8(raw: &[u8]) -> PipeResult<&str> {
    std::str::from_utf8(raw).map_err(|e| {
        Error::Decode(PipelineError::Decoder(format!(
            "frame is not valid UTF-8: {}",
            e
        )))
    })
}

/// Position and length of the next frame delimiter.
///
/// A frame that opens with a bare JSON document (`{` or `[`) is a single line and ends
/// at its newline. SSE field frames end at a blank line (`\n\n` or `\r\n\r\n`).
fn find_frame_end(buf: &[u8]) -> Option<(usize, usize)> {
    let first = buf.iter().position(|b| !b.is_ascii_whitespace())?;
    if matches!(buf[first], b'{' | b'[') {
        return buf[first..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|i| (first + i, 1));
    }

    let mut i = 0;
    while i < buf.len() {
        if buf[i] == b'\n' {
            if buf.get(i + 1) == Some(&b'\n') {
                return Some((i, 2));
            }
            if buf.get(i + 1) == Some(&b'\r') && buf.get(i + 2) == Some(&b'\n') {
                return Some((i, 3));
            }
        }
        i += 1;
    }
    None
}

/// Server-Sent Events decoder:
/// - splits frames on a blank line, or on a newline after a bare JSON line, so
///   newline-delimited JSON decodes without an NDJSON content type
/// - joins `data:` lines of a frame, ignores `event:`/`id:`/`retry:` and `:` comments
/// - stops on the `[DONE]` sentinel
///
/// Bytes are buffered until a frame is complete, so characters split across chunks
/// are decoded correctly.
pub struct SseDecoder {
    done_signal: String,
}

impl SseDecoder {
    pub fn new(done_signal: Option<String>) -> Self {
        Self {
            done_signal: done_signal.unwrap_or_else(|| "[DONE]".to_string()),
        }
    }

    /// Extract the data payload of one frame. `None` for frames without data.
    fn frame_payload(frame: &str) -> Option<String> {
        let mut data: Vec<&str> = Vec::new();
        for line in frame.lines() {
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("data:") {
                data.push(rest.strip_prefix(' ').unwrap_or(rest));
            } else if line.starts_with("event:")
                || line.starts_with("id:")
                || line.starts_with("retry:")
            {
                continue;
            } else {
                // Bare JSON line without an SSE field name.
                data.push(line);
            }
        }
        if data.is_empty() {
            None
        } else {
            Some(data.join("\n"))
        }
    }
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new(None)
    }
}

enum Step {
    Emit(PipeResult<Value>),
    Skip,
    Done,
}

#[async_trait::async_trait]
impl Decoder for SseDecoder {
    async fn decode_stream(
        &self,
        input: BoxStream<'static, Bytes>,
    ) -> PipeResult<BoxStream<'static, Value>> {
        let done_signal = self.done_signal.clone();

        let handle_frame = move |raw: &[u8]| -> Step {
            let frame = match utf8(raw) {
                Ok(f) => f,
                Err(e) => return Step::Emit(Err(e)),
            };
            match Self::frame_payload(frame) {
                None => Step::Skip,
                Some(payload) if payload.trim() == done_signal => Step::Done,
                Some(payload) if payload.trim().is_empty() => Step::Skip,
                Some(payload) => Step::Emit(parse_json(payload.trim())),
            }
        };

        // Incrementally buffer bytes and emit each frame once its delimiter arrives.
        // `None` in the state marks a finished stream.
        let stream = stream::unfold(
            Some((input, Vec::<u8>::new())),
            move |state| {
                let handle_frame = handle_frame.clone();
                async move {
                    let (mut input, mut buf) = state?;
                    loop {
                        if let Some((idx, delim_len)) = find_frame_end(&buf) {
                            let frame: Vec<u8> = buf.drain(..idx + delim_len).collect();
                            match handle_frame(&frame[..idx]) {
                                Step::Emit(item) => return Some((item, Some((input, buf)))),
                                Step::Skip => continue,
                                Step::Done => return None,
                            }
                        }

                        match input.next().await {
                            Some(Ok(bytes)) => {
                                buf.extend_from_slice(&bytes);
                                continue;
                            }
                            Some(Err(e)) => return Some((Err(e), None)),
                            None => {
                                // EOF: the last frame may lack its trailing blank line.
                                if buf.iter().all(|b| b.is_ascii_whitespace()) {
                                    return None;
                                }
                                return match handle_frame(&buf) {
                                    Step::Emit(item) => Some((item, None)),
                                    Step::Skip | Step::Done => None,
                                };
                            }
                        }
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}

/// NDJSON / JSONL decoder (one JSON object per line).
pub struct NdjsonDecoder;

#[async_trait::async_trait]
impl Decoder for NdjsonDecoder {
    async fn decode_stream(
        &self,
        input: BoxStream<'static, Bytes>,
    ) -> PipeResult<BoxStream<'static, Value>> {
        let stream = stream::unfold(
            Some((input, Vec::<u8>::new())),
            move |state| async move {
                let (mut input, mut buf) = state?;
                loop {
                    if let Some(idx) = buf.iter().position(|b| *b == b'\n') {
                        let line: Vec<u8> = buf.drain(..=idx).collect();
                        let line = match utf8(&line) {
                            Ok(l) => l.trim(),
                            Err(e) => return Some((Err(e), None)),
                        };
                        if line.is_empty() {
                            continue;
                        }
                        return Some((parse_json(line), Some((input, buf))));
                    }

                    match input.next().await {
                        Some(Ok(bytes)) => {
                            buf.extend_from_slice(&bytes);
                            continue;
                        }
                        Some(Err(e)) => return Some((Err(e), None)),
                        None => {
                            let line = match utf8(&buf) {
                                Ok(l) => l.trim(),
                                Err(e) => return Some((Err(e), None)),
                            };
                            if line.is_empty() {
                                return None;
                            }
                            return Some((parse_json(line), None));
                        }
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}

/// Pick a decoder from the response content type. Anything that is not NDJSON is
/// treated as SSE, which also accepts bare JSON lines.
pub fn create_decoder(content_type: Option<&str>) -> Box<dyn Decoder> {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|s| s.trim().to_ascii_lowercase());
    match mime.as_deref() {
        Some("application/x-ndjson")
        | Some("application/jsonl")
        | Some("application/json-lines") => Box::new(NdjsonDecoder),
        _ => Box::new(SseDecoder::default()),
    }
}
