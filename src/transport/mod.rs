//! Transport seam: "send a payload, get raw bytes or a byte stream back".
//!
//! The client never talks HTTP directly. It hands a [`TransportRequest`] to a
//! [`Transport`] and receives a [`TransportResponse`] whose body is either complete or
//! a live chunk stream. Authentication, redirects and timeouts belong to the transport.

pub mod http;

pub use http::{HttpTransport, HttpTransportConfig};

use crate::BoxStream;
use async_trait::async_trait;
use bytes::Bytes;

/// What the client asks the transport to send.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub payload: serde_json::Value,
    /// Ask for an incremental response body.
    pub stream: bool,
    /// Correlation id forwarded as `x-request-id`.
    pub request_id: String,
}

/// Response body as delivered by the transport.
pub enum ResponseBody {
    Complete(Bytes),
    /// Chunks in arrival order. Dropping the stream closes the connection.
    Chunks(BoxStream<'static, Bytes>),
}

pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: ResponseBody,
}

impl TransportResponse {
    pub fn complete(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: ResponseBody::Complete(body.into()),
        }
    }

    pub fn chunks(status: u16, chunks: BoxStream<'static, Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: ResponseBody::Chunks(chunks),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = match &self.body {
            ResponseBody::Complete(b) => format!("Complete({} bytes)", b.len()),
            ResponseBody::Chunks(_) => "Chunks(..)".to_string(),
        };
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("body", &body)
            .finish()
    }
}

/// Sends generation payloads to a server.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &TransportRequest) -> crate::Result<TransportResponse>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else {
            TransportError::Http(e)
        }
    }
}
