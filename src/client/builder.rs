use crate::client::capability::{AssumeNative, CapabilityProbe};
use crate::client::core::{ClientMode, TextGenerationClient};
use crate::transport::{HttpTransport, HttpTransportConfig, Transport};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

fn builder_error(field: &str, message: impl Into<String>) -> Error {
    Error::usage_with_context(
        message,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("client_builder"),
    )
}

/// Builder for creating clients with custom configuration.
///
/// Values left unset fall back to the environment:
/// - `TGI_BASE_URL`
/// - `TGI_HTTP_TIMEOUT_SECS` (default 30)
/// - `TGI_HTTP_POOL_MAX_IDLE_PER_HOST` (default 32)
/// - `TGI_HTTP_POOL_IDLE_TIMEOUT_SECS` (default 90)
/// - `TGI_PROXY_URL`
///
/// ```rust,no_run
/// use tgi_client_rust::ClientBuilder;
///
/// # async fn run() -> tgi_client_rust::Result<()> {
/// let client = ClientBuilder::new()
///     .base_url("http://localhost:8080")
///     .model("bigscience/bloom-560m")
///     .build()?;
/// let output = client.generate_text("What is Deep Learning?", None).await?;
/// println!("{}", output.text());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    model_id: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
    pool_max_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    proxy: Option<String>,
    mode: Option<ClientMode>,
    probe: Option<Arc<dyn CapabilityProbe>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoint that accepts generation payloads.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Model id used for capability lookups. Defaults to the base URL.
    pub fn model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Bearer token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Deadline of a single-shot call. Streams use it per chunk, not for their total length.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn pool_max_idle_per_host(mut self, n: usize) -> Self {
        self.pool_max_idle_per_host = Some(n);
        self
    }

    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Pin the mode instead of asking the capability probe.
    pub fn mode(mut self, mode: ClientMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Capability probe consulted once per model id. Default: every model is native.
    pub fn with_probe(mut self, probe: Arc<dyn CapabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Use a custom transport instead of HTTP. Connection settings are then ignored.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TextGenerationClient> {
        let base_url = self
            .base_url
            .or_else(|| std::env::var("TGI_BASE_URL").ok())
            .filter(|s| !s.trim().is_empty());

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let raw = base_url.as_deref().ok_or_else(|| {
                    builder_error("base_url", "a base URL or a custom transport is required")
                })?;
                let endpoint = Url::parse(raw).map_err(|e| {
                    builder_error("base_url", format!("invalid base URL `{}`: {}", raw, e))
                })?;

                let mut config = HttpTransportConfig::from_env(endpoint);
                config.token = self.token;
                if let Some(timeout) = self.timeout {
                    config.timeout = timeout;
                }
                if let Some(n) = self.pool_max_idle_per_host {
                    config.pool_max_idle_per_host = n;
                }
                if let Some(timeout) = self.pool_idle_timeout {
                    config.pool_idle_timeout = timeout;
                }
                if self.proxy.is_some() {
                    config.proxy = self.proxy;
                }
                Arc::new(HttpTransport::new(config)?)
            }
        };

        let model_id = self
            .model_id
            .or(base_url)
            .ok_or_else(|| {
                builder_error("model", "a model id is required with a custom transport")
            })?;

        Ok(TextGenerationClient {
            model_id,
            transport,
            probe: self
                .probe
                .unwrap_or_else(|| Arc::new(AssumeNative) as Arc<dyn CapabilityProbe>),
            mode_override: self.mode,
        })
    }
}
