//! Generic single-shot request shape for servers without the native protocol.
//!
//! Hosted gateways accept `{"inputs", "parameters"}` and answer
//! `[{"generated_text": ...}]`. They have no token stream and no details, so the
//! translation drops what cannot be expressed and reports what it dropped.

use crate::protocol::validator::validate_request;
use crate::protocol::{first_document, ErrorPayload, GenerationParameters};
use crate::client::error_classification::classify;
use crate::pipeline::PipelineError;
use crate::{Error, ErrorContext, Result};
use serde_json::{json, Value};

/// A native call translated to the generic shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRequest {
    pub payload: Value,
    /// Parameters that were set but have no generic equivalent, in a stable order.
    pub ignored_parameters: Vec<&'static str>,
    /// `details` was requested; the caller gets plain text instead.
    pub details_dropped: bool,
}

/// Remove the parameters the generic shape cannot carry, returning their names.
fn strip_unsupported(params: &mut GenerationParameters) -> Vec<&'static str> {
    let mut ignored = Vec::new();
    if params.best_of.take().is_some() {
        ignored.push("best_of");
    }
    if std::mem::take(&mut params.decoder_input_details) {
        ignored.push("decoder_input_details");
    }
    if std::mem::take(&mut params.details) {
        ignored.push("details");
    }
    if !std::mem::take(&mut params.stop).is_empty() {
        ignored.push("stop");
    }
    if params.top_n_tokens.take().is_some() {
        ignored.push("top_n_tokens");
    }
    if std::mem::take(&mut params.watermark) {
        ignored.push("watermark");
    }
    ignored
}

/// Translate a call for a non-native server.
///
/// Streaming is always a usage error, checked before anything else, so no transport
/// call is ever made for it.
pub fn translate(
    inputs: &str,
    parameters: Option<&GenerationParameters>,
    stream: bool,
) -> Result<FallbackRequest> {
    if stream {
        return Err(Error::usage_with_context(
            "streaming is not supported for models without the native text-generation protocol",
            ErrorContext::new()
                .with_field_path("request.stream")
                .with_source("fallback_adapter"),
        ));
    }
    validate_request(inputs, parameters, false)?;

    let mut generic = parameters.cloned().unwrap_or_default();
    let details_dropped = generic.details;
    let ignored_parameters = strip_unsupported(&mut generic);

    let payload = if generic.is_empty() {
        json!({ "inputs": inputs })
    } else {
        json!({ "inputs": inputs, "parameters": serde_json::to_value(&generic)? })
    };

    Ok(FallbackRequest {
        payload,
        ignored_parameters,
        details_dropped,
    })
}

/// Extract the generated text from a generic success body.
pub fn parse_response(body: &[u8]) -> Result<String> {
    let value: Value = serde_json::from_slice(body)?;
    let doc = first_document(value).ok_or_else(|| {
        Error::Decode(PipelineError::MissingField {
            name: "generated_text".to_string(),
            hint: Some("the response array was empty".to_string()),
        })
    })?;
    if let Some(payload) = ErrorPayload::from_value(&doc) {
        return Err(classify(payload));
    }
    doc.get("generated_text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Decode(PipelineError::MissingField {
                name: "generated_text".to_string(),
                hint: None,
            })
        })
}
