//! Generation details attached to completed sequences.

use super::token::{FinishReason, GeneratedToken, InputToken};
use serde::{Deserialize, Serialize};

/// Details of a completed (non-streamed) generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Details {
    pub finish_reason: FinishReason,
    pub generated_tokens: u32,
    /// Present iff sampling was used.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Prompt tokens, only filled when `decoder_input_details` was requested.
    #[serde(default)]
    pub prefill: Vec<InputToken>,
    #[serde(default)]
    pub tokens: Vec<GeneratedToken>,
    /// Most likely alternatives per position, when `top_n_tokens` was requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_tokens: Vec<Vec<GeneratedToken>>,
    /// Alternate candidates when `best_of` > 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_of_sequences: Option<Vec<BestOfSequence>>,
}

/// One of the `best_of` candidates other than the returned one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestOfSequence {
    pub generated_text: String,
    pub finish_reason: FinishReason,
    pub generated_tokens: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub prefill: Vec<InputToken>,
    #[serde(default)]
    pub tokens: Vec<GeneratedToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_tokens: Vec<Vec<GeneratedToken>>,
}

/// Details carried by the final frame of a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDetails {
    pub finish_reason: FinishReason,
    pub generated_tokens: u32,
    #[serde(default)]
    pub seed: Option<u64>,
}
