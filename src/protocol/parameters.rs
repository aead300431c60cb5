//! Generation parameters.

use serde::{Deserialize, Serialize};

fn is_false(v: &bool) -> bool {
    !*v
}

/// Tunables for a generation call.
///
/// Every field is optional; unset fields are omitted from the wire payload so the server
/// applies its own defaults. Bounds are checked by [`super::validator`] before a request is
/// built, so an out-of-range value never reaches the network.
///
/// ```rust
/// use tgi_client_rust::GenerationParameters;
///
/// let params = GenerationParameters::new()
///     .max_new_tokens(20)
///     .temperature(0.7)
///     .top_p(0.95)
///     .validated()?;
/// assert_eq!(params.top_p, Some(0.95));
/// # Ok::<(), tgi_client_rust::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// Generate this many sequences and return the most likely one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_of: Option<u32>,
    /// Return prefill (prompt) token details.
    #[serde(default, skip_serializing_if = "is_false")]
    pub decoder_input_details: bool,
    /// Return token-level generation details.
    #[serde(default, skip_serializing_if = "is_false")]
    pub details: bool,
    /// Sample instead of greedy decoding.
    #[serde(default, skip_serializing_if = "is_false")]
    pub do_sample: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    /// Prepend the prompt to the generated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_full_text: Option<bool>,
    /// Stop generating when any of these sequences appears.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Report this many most likely alternatives per generated position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Truncate the prompt to this many tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_p: Option<f64>,
    /// Watermark the output.
    #[serde(default, skip_serializing_if = "is_false")]
    pub watermark: bool,
}

impl GenerationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the parameter checks and hand the value back unchanged on success.
    pub fn validated(self) -> crate::Result<Self> {
        super::validator::validate_parameters(&self)?;
        Ok(self)
    }

    /// True when nothing is set, i.e. the server defaults apply to everything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn best_of(mut self, n: u32) -> Self {
        self.best_of = Some(n);
        self
    }

    pub fn decoder_input_details(mut self, enable: bool) -> Self {
        self.decoder_input_details = enable;
        self
    }

    pub fn details(mut self, enable: bool) -> Self {
        self.details = enable;
        self
    }

    pub fn do_sample(mut self, enable: bool) -> Self {
        self.do_sample = enable;
        self
    }

    pub fn max_new_tokens(mut self, n: u32) -> Self {
        self.max_new_tokens = Some(n);
        self
    }

    pub fn repetition_penalty(mut self, penalty: f64) -> Self {
        self.repetition_penalty = Some(penalty);
        self
    }

    pub fn return_full_text(mut self, enable: bool) -> Self {
        self.return_full_text = Some(enable);
        self
    }

    pub fn stop(mut self, sequences: Vec<String>) -> Self {
        self.stop = sequences;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn top_k(mut self, k: u32) -> Self {
        self.top_k = Some(k);
        self
    }

    pub fn top_n_tokens(mut self, n: u32) -> Self {
        self.top_n_tokens = Some(n);
        self
    }

    pub fn top_p(mut self, p: f64) -> Self {
        self.top_p = Some(p);
        self
    }

    pub fn truncate(mut self, n: u32) -> Self {
        self.truncate = Some(n);
        self
    }

    pub fn typical_p(mut self, p: f64) -> Self {
        self.typical_p = Some(p);
        self
    }

    pub fn watermark(mut self, enable: bool) -> Self {
        self.watermark = enable;
        self
    }
}
