//! Event mapping (JSON Value -> StreamEvent)
//!
//! A token stream is well formed when it ends with a terminal frame (one carrying
//! `generated_text`). Three things end it early:
//! - an in-band `{"error": ..}` frame, classified like an HTTP error body
//! - an upstream failure (transport, framing), passed through unchanged
//! - the connection closing first, reported as `IncompleteGeneration`
//!
//! Each of these yields exactly one error after the events already received, then
//! the stream ends.

use crate::client::error_classification::classify;
use crate::error_code::ServerErrorKind;
use crate::pipeline::{Mapper, PipelineError};
use crate::protocol::ErrorPayload;
use crate::types::events::StreamEvent;
use crate::{BoxStream, Error, PipeResult};
use futures::{stream, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};

/// Decode one frame. `Ok(None)` marks a frame with nothing to report.
pub fn map_frame(frame: Value) -> PipeResult<Option<StreamEvent>> {
    if let Some(payload) = ErrorPayload::from_value(&frame) {
        return Err(classify(payload));
    }
    if frame.get("token").map(Value::is_null).unwrap_or(true) {
        // Keep-alive or metadata-only frame.
        if frame.get("generated_text").map(|v| !v.is_null()).unwrap_or(false) {
            return Err(Error::Decode(
                PipelineError::MissingField {
                    name: "token".to_string(),
                    hint: None,
                }
                .with_hint("final frames carry the last generated token"),
            ));
        }
        return Ok(None);
    }
    serde_json::from_value::<StreamEvent>(frame)
        .map(Some)
        .map_err(|e| Error::Decode(PipelineError::EventMapper(e.to_string())))
}

/// Maps text-generation stream frames to [`StreamEvent`]s.
pub struct TokenEventMapper;

struct MapState {
    input: BoxStream<'static, Value>,
    saw_terminal: bool,
    finished: bool,
    events: usize,
}

#[async_trait::async_trait]
impl Mapper for TokenEventMapper {
    async fn map(
        &self,
        input: BoxStream<'static, Value>,
    ) -> PipeResult<BoxStream<'static, StreamEvent>> {
        let state = MapState {
            input,
            saw_terminal: false,
            finished: false,
            events: 0,
        };

        let stream = stream::unfold(state, |mut st| async move {
            if st.finished {
                return None;
            }

            while let Some(item) = st.input.next().await {
                let frame = match item {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!(events = st.events, error = %e, "token stream failed upstream");
                        st.finished = true;
                        return Some((Err(e), st));
                    }
                };

                match map_frame(frame) {
                    Ok(Some(event)) => {
                        if st.saw_terminal {
                            debug!("ignoring frame after terminal event");
                            continue;
                        }
                        st.saw_terminal = event.is_terminal();
                        st.events += 1;
                        return Some((Ok(event), st));
                    }
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(events = st.events, error = %e, "token stream reported an error");
                        st.finished = true;
                        return Some((Err(e), st));
                    }
                }
            }

            st.finished = true;
            if st.saw_terminal {
                return None;
            }
            warn!(events = st.events, "token stream closed before its final event");
            Some((
                Err(Error::from_server(
                    ServerErrorKind::IncompleteGeneration,
                    format!(
                        "stream closed after {} event(s) without a final event",
                        st.events
                    ),
                )),
                st,
            ))
        });

        Ok(Box::pin(stream))
    }
}
