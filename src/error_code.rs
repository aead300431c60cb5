//! Server error kinds reported through the `error_type` tag.
//!
//! A text-generation server reports failures as `{"error": "...", "error_type": "..."}`,
//! both as HTTP error bodies and as in-band stream frames. This module defines the closed
//! set of kinds the client understands, together with their retry semantics.
//!
//! | Tag                     | Kind                  | Retryable | Category     |
//! |-------------------------|-----------------------|-----------|--------------|
//! | `generation`            | `Generation`          | no        | `server`     |
//! | `incomplete_generation` | `IncompleteGeneration`| no        | `server`     |
//! | `overloaded`            | `Overloaded`          | yes       | `capacity`   |
//! | `validation`            | `Validation`          | no        | `validation` |
//! | anything else / unset   | `Generation`          | no        | `server`     |
//!
//! ## Example
//!
//! ```rust
//! use tgi_client_rust::error_code::ServerErrorKind;
//!
//! let kind = ServerErrorKind::from_error_type(Some("overloaded"));
//! assert_eq!(kind, ServerErrorKind::Overloaded);
//! assert!(kind.retryable());
//! assert_eq!(kind.category(), "capacity");
//! ```

use std::fmt;

/// Failure kind carried by a server error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerErrorKind {
    /// Generic failure while generating.
    Generation,
    /// Generation stopped before the sequence completed.
    IncompleteGeneration,
    /// Server is at capacity.
    Overloaded,
    /// Request rejected by server-side validation.
    Validation,
}

impl ServerErrorKind {
    /// All kinds, in tag order.
    pub const ALL: [ServerErrorKind; 4] = [
        Self::Generation,
        Self::IncompleteGeneration,
        Self::Overloaded,
        Self::Validation,
    ];

    /// Returns the wire tag (e.g., `"incomplete_generation"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::IncompleteGeneration => "incomplete_generation",
            Self::Overloaded => "overloaded",
            Self::Validation => "validation",
        }
    }

    /// Only capacity errors are conventionally retried; everything else is terminal
    /// for the request as constructed.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Overloaded)
    }

    /// Returns the category: `"server"`, `"capacity"` or `"validation"`.
    ///
    /// Client-side parameter failures report the `"validation"` category too, so callers
    /// branching on category treat both sides alike.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Generation | Self::IncompleteGeneration => "server",
            Self::Overloaded => "capacity",
            Self::Validation => "validation",
        }
    }

    /// Maps a recognised tag to its kind. Unrecognised tags return `None`.
    pub fn from_known_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "generation" => Self::Generation,
            "incomplete_generation" => Self::IncompleteGeneration,
            "overloaded" => Self::Overloaded,
            "validation" => Self::Validation,
            _ => return None,
        };
        Some(kind)
    }

    /// Maps an optional `error_type` tag to a kind, falling back to `Generation`.
    pub fn from_error_type(tag: Option<&str>) -> Self {
        tag.and_then(Self::from_known_tag).unwrap_or(Self::Generation)
    }
}

impl fmt::Display for ServerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
