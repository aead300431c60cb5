//! Validated generation request and its wire payload.

use super::parameters::GenerationParameters;
use super::validator::validate_request;
use crate::Result;
use serde::Serialize;

fn no_parameters(parameters: &Option<GenerationParameters>) -> bool {
    parameters.as_ref().map(|p| p.is_empty()).unwrap_or(true)
}

/// A generation request that passed every client-side check.
///
/// The only way to obtain one is [`TextGenerationRequest::new`], so any value of this type
/// is safe to put on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextGenerationRequest {
    inputs: String,
    #[serde(skip_serializing_if = "no_parameters")]
    parameters: Option<GenerationParameters>,
    stream: bool,
}

impl TextGenerationRequest {
    pub fn new(
        inputs: impl Into<String>,
        parameters: Option<GenerationParameters>,
        stream: bool,
    ) -> Result<Self> {
        let inputs = inputs.into();
        validate_request(&inputs, parameters.as_ref(), stream)?;
        Ok(Self {
            inputs,
            parameters,
            stream,
        })
    }

    pub fn inputs(&self) -> &str {
        &self.inputs
    }

    pub fn parameters(&self) -> Option<&GenerationParameters> {
        self.parameters.as_ref()
    }

    pub fn stream(&self) -> bool {
        self.stream
    }

    /// Whether the caller asked for token-level details.
    pub fn details(&self) -> bool {
        self.parameters.as_ref().map(|p| p.details).unwrap_or(false)
    }

    /// Wire payload: `{inputs, parameters?, stream}` with unset fields omitted.
    pub fn to_payload(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Validate and serialize in one step.
pub fn build_payload(
    inputs: impl Into<String>,
    parameters: Option<GenerationParameters>,
    stream: bool,
) -> Result<serde_json::Value> {
    TextGenerationRequest::new(inputs, parameters, stream)?.to_payload()
}
