//! Error classification logic
//!
//! Maps a server error payload to a failure kind. The same mapping serves HTTP error
//! bodies and in-band stream error frames.

use crate::error_code::ServerErrorKind;
use crate::protocol::{first_document, ErrorPayload};
use crate::transport::TransportError;
use crate::Error;

/// Message fragment hosted inference gateways return when a model does not accept the
/// native generation parameters.
pub(crate) const MODEL_KWARGS_MARKER: &str =
    "The following `model_kwargs` are not used by the model";

/// Classify a server error payload. Total: unknown or missing tags become `Generation`.
/// The message is preserved verbatim.
pub fn classify(payload: ErrorPayload) -> Error {
    let kind = ServerErrorKind::from_error_type(payload.error_type.as_deref());
    Error::from_server(kind, payload.error)
}

/// Classify a non-success HTTP response body.
///
/// Bodies without an `error` field (or that are not JSON at all) cannot be classified
/// and surface as a transport status error.
pub fn classify_http_error(status: u16, body: &[u8]) -> Error {
    let payload = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(first_document)
        .and_then(|doc| ErrorPayload::from_value(&doc));

    match payload {
        Some(payload) => classify(payload),
        None => Error::Transport(TransportError::Status {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}

/// Whether a failed native call means the model only understands the generic shape.
pub(crate) fn is_model_kwargs_rejection(status: u16, err: &Error) -> bool {
    if status != 400 {
        return false;
    }
    match err {
        Error::Transport(TransportError::Status { body, .. }) => body.contains(MODEL_KWARGS_MARKER),
        other => other
            .server_message()
            .map(|m| m.contains(MODEL_KWARGS_MARKER))
            .unwrap_or(false),
    }
}
