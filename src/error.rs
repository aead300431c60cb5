use crate::error_code::ServerErrorKind;
use crate::pipeline::PipelineError;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for caller-side failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or option that caused the error (e.g., "request.stream")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., model id, expected value)
    pub details: Option<String>,
    /// Source of the error (e.g., "client_builder", "fallback_adapter")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the text-generation client.
///
/// Ordered roughly from "never left the process" to "caller misuse":
/// pre-flight parameter failures, server-classified failures, transport failures,
/// malformed responses and usage errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Client-side parameter check failed. Nothing was sent.
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    /// Server rejected the request during validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic server-side generation failure.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Generation stopped early, or the stream closed before its final event.
    #[error("Incomplete generation: {0}")]
    IncompleteGeneration(String),

    /// Server at capacity.
    #[error("Model overloaded: {0}")]
    Overloaded(String),

    /// Caller misuse, such as streaming from a server without the native protocol.
    #[error("Usage error: {message}{}", format_context(.context))]
    Usage {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Response decoding error: {0}")]
    Decode(#[from] PipelineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn usage_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Usage {
            message: msg.into(),
            context,
        }
    }

    /// Build the failure for a server-reported error kind, keeping the message verbatim.
    pub fn from_server(kind: ServerErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ServerErrorKind::Generation => Error::Generation(message),
            ServerErrorKind::IncompleteGeneration => Error::IncompleteGeneration(message),
            ServerErrorKind::Overloaded => Error::Overloaded(message),
            ServerErrorKind::Validation => Error::Validation(message),
        }
    }

    /// The server-side kind, if this error came from (or mirrors) a server error payload.
    pub fn server_kind(&self) -> Option<ServerErrorKind> {
        match self {
            Error::Generation(_) => Some(ServerErrorKind::Generation),
            Error::IncompleteGeneration(_) => Some(ServerErrorKind::IncompleteGeneration),
            Error::Overloaded(_) => Some(ServerErrorKind::Overloaded),
            Error::Validation(_) => Some(ServerErrorKind::Validation),
            _ => None,
        }
    }

    /// The unmodified message of a server-classified error.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Generation(m)
            | Error::IncompleteGeneration(m)
            | Error::Overloaded(m)
            | Error::Validation(m) => Some(m.as_str()),
            _ => None,
        }
    }

    /// Whether retrying the same request with backoff is conventionally safe.
    pub fn is_retryable(&self) -> bool {
        self.server_kind()
            .map(|k| k.retryable())
            .unwrap_or(false)
    }

    /// Whether the transport gave up waiting.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(TransportError::Timeout(_)))
    }

    /// Coarse category for callers that branch on error kind.
    ///
    /// Client-side `InvalidParameter` and server-side `Validation` share `"validation"`.
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidParameter { .. } => "validation",
            Error::Usage { .. } => "usage",
            Error::Transport(_) => "transport",
            Error::Decode(_) | Error::Serialization(_) => "protocol",
            other => other.server_kind().map(|k| k.category()).unwrap_or("server"),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Usage { context, .. } => Some(context),
            _ => None,
        }
    }
}
