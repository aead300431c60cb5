//! # tgi-client-rust
//!
//! Client-side protocol adapter for text-generation inference servers.
//!
//! ## Overview
//!
//! The crate validates generation parameters against the server's own constraints before
//! anything is sent, dispatches a single-shot or streamed call, and decodes the response
//! (success or error) into typed values. Servers that only expose a generic single-shot
//! API are handled in fallback mode.
//!
//! ```text
//! params → validator → request builder → transport → body | byte stream
//!                                                       │         │
//!                                              single response  stream decoder
//!                                                       └── error classifier ──┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use tgi_client_rust::{ClientBuilder, GenerationParameters};
//!
//! #[tokio::main]
//! async fn main() -> tgi_client_rust::Result<()> {
//!     let client = ClientBuilder::new()
//!         .base_url("http://localhost:8080")
//!         .build()?;
//!
//!     let params = GenerationParameters::new().max_new_tokens(20);
//!     let mut stream = client.generate_stream("What is Deep Learning?", Some(params)).await?;
//!     while let Some(event) = stream.next().await {
//!         print!("{}", event?.token.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Parameters, validation and request payloads |
//! | [`client`] | Client, builder, fallback mode and error classification |
//! | [`pipeline`] | Streaming response decoding |
//! | [`transport`] | Transport seam and the reqwest implementation |
//! | [`types`] | Tokens, details, responses and stream events |
//! | [`error_code`] | Server error kinds |

pub mod client;
pub mod error_code;
pub mod pipeline;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::{
    ClientBuilder, ClientMode, GenerationOutcome, StreamedGeneration, TextGenerationBuilder,
    TextGenerationClient, TextGenerationStream,
};
pub use error_code::ServerErrorKind;
pub use protocol::{GenerationParameters, TextGenerationRequest};
pub use types::{
    Details, FinishReason, GeneratedToken, InputToken, StreamEvent, TextGenerationOutput,
    TextGenerationResponse,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A specialized Result for pipeline operations
pub type PipeResult<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `PipeResult<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = PipeResult<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
