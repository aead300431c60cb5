//! Non-streaming generation results.

use super::details::Details;
use serde::{Deserialize, Serialize};

/// Body of a successful single-shot generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationResponse {
    pub generated_text: String,
    #[serde(default)]
    pub details: Option<Details>,
}

/// What a non-streaming call hands back: plain text, or text plus details when
/// `details` was requested.
#[derive(Debug, Clone, PartialEq)]
pub enum TextGenerationOutput {
    Text(String),
    Detailed(TextGenerationResponse),
}

impl TextGenerationOutput {
    /// The generated text, whichever shape was returned.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Detailed(resp) => &resp.generated_text,
        }
    }

    pub fn details(&self) -> Option<&Details> {
        match self {
            Self::Text(_) => None,
            Self::Detailed(resp) => resp.details.as_ref(),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Detailed(resp) => resp.generated_text,
        }
    }
}
