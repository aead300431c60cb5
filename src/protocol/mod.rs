//! Wire protocol of text-generation inference servers.
//!
//! ## Request
//!
//! ```text
//! { "inputs": string, "parameters"?: { ..set fields only.. }, "stream": bool }
//! ```
//!
//! ## Responses
//!
//! ```text
//! single-shot  { "generated_text": string, "details"?: {...} }   (or a one-element array)
//! stream frame { "token": {id, text, logprob, special}, "generated_text"?: string, "details"?: {...} }
//! error        { "error": string, "error_type": string }
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`parameters`] | Generation tunables |
//! | [`validator`] | Client-side bounds checks |
//! | [`request`] | Validated request and payload builder |

pub mod parameters;
pub mod request;
pub mod validator;

pub use parameters::GenerationParameters;
pub use request::{build_payload, TextGenerationRequest};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-reported error body. Transient: only lives until it is classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(default)]
    pub error_type: Option<String>,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>, error_type: Option<&str>) -> Self {
        Self {
            error: error.into(),
            error_type: error_type.map(str::to_string),
        }
    }

    /// Extract an error payload from a decoded JSON document, if it has an `error` field.
    ///
    /// Non-string `error` values are kept as their JSON text.
    pub fn from_value(value: &Value) -> Option<Self> {
        let error = value.get("error")?;
        if error.is_null() {
            return None;
        }
        let error = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let error_type = value
            .get("error_type")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Some(Self { error, error_type })
    }
}

/// Unwrap the one-element array some gateways put around single-shot bodies.
pub(crate) fn first_document(value: Value) -> Option<Value> {
    match value {
        Value::Array(items) => items.into_iter().next(),
        other => Some(other),
    }
}
