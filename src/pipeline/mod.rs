//! Stream decoding: turns a chunked response body into typed token events.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Raw Bytes → Decoder → Event Mapper → StreamEvent
//!     │           │            │
//!   HTTP      SSE/NDJSON    token frames, in-band error frames,
//!   chunks    framing       premature close detection
//! ```
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Pipeline`] | Decoder + mapper pair for one response |
//! | [`Decoder`] | Bytes to JSON frames |
//! | [`Mapper`] | JSON frames to [`StreamEvent`]s |
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use futures::{stream, StreamExt};
//! use tgi_client_rust::pipeline::Pipeline;
//!
//! # tokio_test::block_on(async {
//! let body = Bytes::from_static(
//!     b"data: {\"token\":{\"id\":1,\"text\":\"Hi\",\"logprob\":-0.1,\"special\":false},\"generated_text\":\"Hi\"}\n\n",
//! );
//! let chunks = Box::pin(stream::iter(vec![Ok::<_, tgi_client_rust::Error>(body)]));
//! let events: Vec<_> = Pipeline::sse().process_stream(chunks).await?.collect().await;
//! assert_eq!(events.len(), 1);
//! # Ok::<(), tgi_client_rust::Error>(())
//! # }).unwrap();
//! ```

pub mod decode;
pub mod event_map;

use crate::types::events::StreamEvent;
use crate::{BoxStream, PipeResult};

/// Specialized mapper for the final stage of the pipeline
#[async_trait::async_trait]
pub trait Mapper: Send + Sync {
    /// Map decoded JSON frames to token events.
    async fn map(
        &self,
        input: BoxStream<'static, serde_json::Value>,
    ) -> PipeResult<BoxStream<'static, StreamEvent>>;
}

/// Decoder trait for stream decoding
#[async_trait::async_trait]
pub trait Decoder: Send + Sync {
    /// Decode a byte stream into JSON values
    async fn decode_stream(
        &self,
        input: BoxStream<'static, bytes::Bytes>,
    ) -> PipeResult<BoxStream<'static, serde_json::Value>>;
}

/// Pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Malformed frame `{frame}`: {error}")]
    InvalidFrame { frame: String, error: String },

    #[error("Event mapper error: {0}")]
    EventMapper(String),

    #[error("Missing required field: {name}{}", .hint.as_ref().map(|h| format!(" (hint: {})", h)).unwrap_or_default())]
    MissingField { name: String, hint: Option<String> },
}

impl PipelineError {
    /// Attach an actionable hint to the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        if let PipelineError::MissingField { hint: ref mut slot, .. } = self {
            *slot = Some(hint.into());
        }
        self
    }
}

/// Decoder and mapper for one streaming response.
pub struct Pipeline {
    decoder: Box<dyn Decoder>,
    mapper: Box<dyn Mapper>,
}

impl Pipeline {
    pub fn new(decoder: Box<dyn Decoder>, mapper: Box<dyn Mapper>) -> Self {
        Self { decoder, mapper }
    }

    /// Server-Sent Events framing.
    pub fn sse() -> Self {
        Self::new(
            Box::new(decode::SseDecoder::default()),
            Box::new(event_map::TokenEventMapper),
        )
    }

    /// Newline-delimited JSON framing.
    pub fn ndjson() -> Self {
        Self::new(
            Box::new(decode::NdjsonDecoder),
            Box::new(event_map::TokenEventMapper),
        )
    }

    /// Pick framing from the response `Content-Type`.
    pub fn for_content_type(content_type: Option<&str>) -> Self {
        Self::new(
            decode::create_decoder(content_type),
            Box::new(event_map::TokenEventMapper),
        )
    }

    /// Process a byte stream through the pipeline
    pub async fn process_stream(
        &self,
        input: BoxStream<'static, bytes::Bytes>,
    ) -> PipeResult<BoxStream<'static, StreamEvent>> {
        let frames = self.decoder.decode_stream(input).await?;
        self.mapper.map(frames).await
    }
}
