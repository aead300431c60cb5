//! Streaming token events.

use super::details::StreamDetails;
use super::token::GeneratedToken;
use serde::{Deserialize, Serialize};

/// One frame of a token stream.
///
/// Every frame carries the token it produced. Only the final frame carries
/// `generated_text` (and `details` when they were requested).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub token: GeneratedToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<StreamDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_tokens: Option<Vec<GeneratedToken>>,
}

impl StreamEvent {
    /// The final frame of a stream: it carries the full generated text.
    pub fn is_terminal(&self) -> bool {
        self.generated_text.is_some() || self.details.is_some()
    }
}
