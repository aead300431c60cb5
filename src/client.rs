//! Text-generation client.
//!
//! Keep the public surface small: build a [`TextGenerationClient`], then call
//! [`TextGenerationClient::generate`] or one of its typed wrappers.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod capability;
pub mod core;
pub mod error_classification;
pub mod fallback;
pub mod generate;
pub mod stream;

pub use builder::ClientBuilder;
pub use capability::{AssumeNative, CapabilityProbe};
pub use core::{ClientMode, GenerationOutcome, TextGenerationClient};
pub use generate::TextGenerationBuilder;
pub use stream::{StreamedGeneration, TextGenerationStream};
