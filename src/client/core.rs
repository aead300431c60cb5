use crate::client::capability::{self, CapabilityProbe};
use crate::client::error_classification::{classify, classify_http_error, is_model_kwargs_rejection};
use crate::client::fallback;
use crate::client::generate::TextGenerationBuilder;
use crate::client::stream::TextGenerationStream;
use crate::pipeline::{Pipeline, PipelineError};
use crate::protocol::{first_document, ErrorPayload, GenerationParameters, TextGenerationRequest};
use crate::transport::{ResponseBody, Transport, TransportRequest};
use crate::types::{TextGenerationOutput, TextGenerationResponse};
use crate::{Error, Result};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Which protocol the client speaks to a model. Chosen once per model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientMode {
    /// Streaming, detail-rich text-generation protocol.
    Native,
    /// Generic single-shot `{"inputs", "parameters"}` API.
    Fallback,
}

impl ClientMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientMode::Native => "native",
            ClientMode::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ClientMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`TextGenerationClient::generate`].
#[derive(Debug)]
pub enum GenerationOutcome {
    Complete(TextGenerationOutput),
    Stream(TextGenerationStream),
}

impl GenerationOutcome {
    pub fn into_output(self) -> Option<TextGenerationOutput> {
        match self {
            GenerationOutcome::Complete(output) => Some(output),
            GenerationOutcome::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<TextGenerationStream> {
        match self {
            GenerationOutcome::Stream(stream) => Some(stream),
            GenerationOutcome::Complete(_) => None,
        }
    }
}

/// Client for one model behind a text-generation endpoint.
///
/// Calls are independent: the client holds no per-request state and can be shared
/// across tasks.
pub struct TextGenerationClient {
    pub(crate) model_id: String,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) probe: Arc<dyn CapabilityProbe>,
    /// Fixed mode; skips the capability cache and learned fallback.
    pub(crate) mode_override: Option<ClientMode>,
}

impl TextGenerationClient {
    pub fn builder() -> crate::client::builder::ClientBuilder {
        crate::client::builder::ClientBuilder::new()
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// The mode calls for this model currently use.
    pub async fn mode(&self) -> Result<ClientMode> {
        match self.mode_override {
            Some(mode) => Ok(mode),
            None => capability::resolve_mode(&self.model_id, self.probe.as_ref()).await,
        }
    }

    /// Start a fluent request.
    pub fn text_generation(&self, inputs: impl Into<String>) -> TextGenerationBuilder<'_> {
        TextGenerationBuilder::new(self, inputs.into())
    }

    /// Single-shot generation.
    pub async fn generate_text(
        &self,
        inputs: &str,
        parameters: Option<GenerationParameters>,
    ) -> Result<TextGenerationOutput> {
        match self.generate(inputs, parameters, false).await? {
            GenerationOutcome::Complete(output) => Ok(output),
            GenerationOutcome::Stream(_) => Err(Error::Decode(PipelineError::EventMapper(
                "received a stream for a single-shot call".to_string(),
            ))),
        }
    }

    /// Streamed generation.
    pub async fn generate_stream(
        &self,
        inputs: &str,
        parameters: Option<GenerationParameters>,
    ) -> Result<TextGenerationStream> {
        match self.generate(inputs, parameters, true).await? {
            GenerationOutcome::Stream(stream) => Ok(stream),
            GenerationOutcome::Complete(_) => Err(Error::Decode(PipelineError::EventMapper(
                "received a single response for a streamed call".to_string(),
            ))),
        }
    }

    /// Validate, send and decode one call.
    ///
    /// Parameter failures never reach the network. Non-streaming calls return the
    /// decoded body; streaming calls return the lazy event sequence, which the caller
    /// drives.
    pub async fn generate(
        &self,
        inputs: &str,
        parameters: Option<GenerationParameters>,
        stream: bool,
    ) -> Result<GenerationOutcome> {
        match self.mode().await? {
            ClientMode::Fallback => self
                .generate_fallback(inputs, parameters.as_ref(), stream)
                .await
                .map(GenerationOutcome::Complete),
            ClientMode::Native => self.generate_native(inputs, parameters, stream).await,
        }
    }

    async fn generate_native(
        &self,
        inputs: &str,
        parameters: Option<GenerationParameters>,
        stream: bool,
    ) -> Result<GenerationOutcome> {
        let request = TextGenerationRequest::new(inputs, parameters, stream)?;
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        info!(
            model = self.model_id.as_str(),
            request_id = request_id.as_str(),
            mode = ClientMode::Native.as_str(),
            stream,
            "text generation request"
        );

        let resp = self
            .transport
            .send(&TransportRequest {
                payload: request.to_payload()?,
                stream,
                request_id: request_id.clone(),
            })
            .await?;
        let http_status = resp.status;

        if !resp.is_success() {
            let err = classify_http_error(http_status, &read_complete(resp.body).await?);
            info!(
                model = self.model_id.as_str(),
                request_id = request_id.as_str(),
                http_status,
                duration_ms = start.elapsed().as_millis() as u64,
                error = %err,
                "text generation request failed"
            );

            if self.mode_override.is_none() && is_model_kwargs_rejection(http_status, &err) {
                capability::mark_non_native(&self.model_id);
                warn!(
                    model = self.model_id.as_str(),
                    "model does not accept native generation parameters; switching to fallback mode"
                );
                return self
                    .generate_fallback(request.inputs(), request.parameters(), stream)
                    .await
                    .map(GenerationOutcome::Complete);
            }
            return Err(err);
        }

        if stream {
            let chunks = match resp.body {
                ResponseBody::Chunks(chunks) => chunks,
                ResponseBody::Complete(body) => {
                    Box::pin(futures::stream::iter(vec![Ok::<Bytes, Error>(body)]))
                        as crate::BoxStream<'static, Bytes>
                }
            };
            let events = Pipeline::for_content_type(resp.content_type.as_deref())
                .process_stream(chunks)
                .await?;
            info!(
                model = self.model_id.as_str(),
                request_id = request_id.as_str(),
                http_status,
                duration_ms = start.elapsed().as_millis() as u64,
                "text generation stream opened"
            );
            return Ok(GenerationOutcome::Stream(TextGenerationStream::new(
                events, request_id,
            )));
        }

        let body = read_complete(resp.body).await?;
        let output = decode_native_response(&body, request.details())?;
        info!(
            model = self.model_id.as_str(),
            request_id = request_id.as_str(),
            http_status,
            duration_ms = start.elapsed().as_millis() as u64,
            "text generation request finished"
        );
        Ok(GenerationOutcome::Complete(output))
    }

    async fn generate_fallback(
        &self,
        inputs: &str,
        parameters: Option<&GenerationParameters>,
        stream: bool,
    ) -> Result<TextGenerationOutput> {
        let translated = fallback::translate(inputs, parameters, stream)?;
        if !translated.ignored_parameters.is_empty() {
            warn!(
                model = self.model_id.as_str(),
                ignored = ?translated.ignored_parameters,
                "parameters not supported in fallback mode were ignored"
            );
        }
        if translated.details_dropped {
            warn!(
                model = self.model_id.as_str(),
                "details are not available in fallback mode; returning plain text"
            );
        }

        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        info!(
            model = self.model_id.as_str(),
            request_id = request_id.as_str(),
            mode = ClientMode::Fallback.as_str(),
            "text generation request"
        );

        let resp = self
            .transport
            .send(&TransportRequest {
                payload: translated.payload,
                stream: false,
                request_id: request_id.clone(),
            })
            .await?;
        let http_status = resp.status;
        let success = resp.is_success();
        let body = read_complete(resp.body).await?;

        let result = if success {
            fallback::parse_response(&body)
        } else {
            Err(classify_http_error(http_status, &body))
        };
        info!(
            model = self.model_id.as_str(),
            request_id = request_id.as_str(),
            http_status,
            duration_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "text generation request finished"
        );
        result.map(TextGenerationOutput::Text)
    }
}

impl fmt::Debug for TextGenerationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextGenerationClient")
            .field("model_id", &self.model_id)
            .field("mode_override", &self.mode_override)
            .finish_non_exhaustive()
    }
}

/// Read a whole body, draining a chunk stream if the transport returned one.
async fn read_complete(body: ResponseBody) -> Result<Bytes> {
    use futures::TryStreamExt;
    match body {
        ResponseBody::Complete(bytes) => Ok(bytes),
        ResponseBody::Chunks(chunks) => {
            let parts: Vec<Bytes> = chunks.try_collect().await?;
            Ok(Bytes::from(parts.concat()))
        }
    }
}

/// Decode a native single-shot body.
///
/// Accepts an object or a one-element array. An `error` field is classified even on a
/// success status.
pub fn decode_native_response(body: &[u8], details: bool) -> Result<TextGenerationOutput> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let doc = first_document(value).ok_or_else(|| {
        Error::Decode(PipelineError::MissingField {
            name: "generated_text".to_string(),
            hint: Some("the response array was empty".to_string()),
        })
    })?;
    if let Some(payload) = ErrorPayload::from_value(&doc) {
        return Err(classify(payload));
    }
    let response: TextGenerationResponse = serde_json::from_value(doc)?;
    Ok(if details {
        TextGenerationOutput::Detailed(response)
    } else {
        TextGenerationOutput::Text(response.generated_text)
    })
}
