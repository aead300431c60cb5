//! Token records returned by the server.

use serde::{Deserialize, Serialize};

/// A prompt token echoed back during prefill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputToken {
    pub id: u32,
    pub text: String,
    /// Absent for the first token of a sequence, which has no preceding context.
    #[serde(default)]
    pub logprob: Option<f64>,
}

/// A token produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedToken {
    pub id: u32,
    pub text: String,
    pub logprob: f64,
    /// Control or sentinel token, usually left out of user-visible text.
    #[serde(default)]
    pub special: bool,
}

/// Why a sequence stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinishReason {
    /// `max_new_tokens` reached
    #[serde(rename = "length")]
    Length,
    /// End-of-sequence token emitted
    #[serde(rename = "eos_token")]
    EndOfSequenceToken,
    /// One of the `stop` sequences was generated
    #[serde(rename = "stop_sequence")]
    StopSequence,
}
