//! Core value types of the text-generation protocol.
//!
//! All records are immutable values built once from the wire and handed to the caller.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`InputToken`] | Prompt token echoed during prefill |
//! | [`GeneratedToken`] | Token produced by the model |
//! | [`FinishReason`] | Why a sequence stopped |
//! | [`Details`] | Token-level details of a completed generation |
//! | [`BestOfSequence`] | Alternate `best_of` candidate |
//! | [`StreamEvent`] | One frame of a token stream |
//! | [`TextGenerationOutput`] | Result of a non-streaming call |

pub mod details;
pub mod events;
pub mod response;
pub mod token;

pub use details::{BestOfSequence, Details, StreamDetails};
pub use events::StreamEvent;
pub use response::{TextGenerationOutput, TextGenerationResponse};
pub use token::{FinishReason, GeneratedToken, InputToken};
