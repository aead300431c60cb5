use crate::error_code::ServerErrorKind;
use crate::types::{GeneratedToken, StreamDetails, StreamEvent};
use crate::{BoxStream, Error, Result};
use futures::stream::{Stream, StreamExt, TryStreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Lazy sequence of token events for one streamed call.
///
/// Events are yielded in arrival order; each poll reads at most one frame from the
/// connection. Dropping the stream closes the connection. After an error the stream
/// ends.
pub struct TextGenerationStream {
    inner: BoxStream<'static, StreamEvent>,
    request_id: String,
}

/// A drained stream: the final text plus every token seen on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamedGeneration {
    pub generated_text: String,
    pub details: Option<StreamDetails>,
    pub tokens: Vec<GeneratedToken>,
}

impl TextGenerationStream {
    pub(crate) fn new(inner: BoxStream<'static, StreamEvent>, request_id: String) -> Self {
        Self { inner, request_id }
    }

    /// Correlation id sent as `x-request-id`.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Token texts only, skipping special tokens.
    pub fn into_text(self) -> BoxStream<'static, String> {
        Box::pin(self.inner.try_filter_map(|event| async move {
            Ok((!event.token.special).then_some(event.token.text))
        }))
    }

    /// Drain the stream and return the final event's text and details.
    pub async fn collect_response(mut self) -> Result<StreamedGeneration> {
        let mut tokens = Vec::new();
        while let Some(event) = self.inner.next().await {
            let event = event?;
            tokens.push(event.token);
            if let Some(generated_text) = event.generated_text {
                return Ok(StreamedGeneration {
                    generated_text,
                    details: event.details,
                    tokens,
                });
            }
        }
        Err(Error::from_server(
            ServerErrorKind::IncompleteGeneration,
            "stream ended without a final event",
        ))
    }
}

impl Stream for TextGenerationStream {
    type Item = Result<StreamEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for TextGenerationStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextGenerationStream")
            .field("request_id", &self.request_id)
            .finish_non_exhaustive()
    }
}
