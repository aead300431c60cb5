use super::{ResponseBody, Transport, TransportError, TransportRequest, TransportResponse};
use crate::{BoxStream, Error, ErrorContext, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt, TryStreamExt};
use reqwest::Proxy;
use std::env;
use std::time::Duration;
use url::Url;

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub endpoint: Url,
    pub token: Option<String>,
    /// Connect timeout, total deadline of a single-shot call, and for streams the
    /// deadline for the response head and the longest gap between two chunks.
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub proxy: Option<String>,
}

impl HttpTransportConfig {
    /// Defaults, overridable through the environment:
    /// - `TGI_HTTP_TIMEOUT_SECS` (30)
    /// - `TGI_HTTP_POOL_MAX_IDLE_PER_HOST` (32)
    /// - `TGI_HTTP_POOL_IDLE_TIMEOUT_SECS` (90)
    /// - `TGI_PROXY_URL`
    pub fn from_env(endpoint: Url) -> Self {
        Self {
            endpoint,
            token: None,
            timeout: Duration::from_secs(env_parse("TGI_HTTP_TIMEOUT_SECS").unwrap_or(30)),
            pool_max_idle_per_host: env_parse("TGI_HTTP_POOL_MAX_IDLE_PER_HOST").unwrap_or(32),
            pool_idle_timeout: Duration::from_secs(
                env_parse("TGI_HTTP_POOL_IDLE_TIMEOUT_SECS").unwrap_or(90),
            ),
            proxy: env::var("TGI_PROXY_URL").ok().filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Fail a chunk stream with [`TransportError::Timeout`] when no chunk arrives within `idle`.
fn with_idle_timeout(
    chunks: BoxStream<'static, Bytes>,
    idle: Duration,
) -> BoxStream<'static, Bytes> {
    Box::pin(stream::unfold(Some(chunks), move |state| async move {
        let mut chunks = state?;
        match tokio::time::timeout(idle, chunks.next()).await {
            Ok(Some(item)) => Some((item, Some(chunks))),
            Ok(None) => None,
            Err(_) => Some((
                Err(Error::Transport(TransportError::Timeout(format!(
                    "no stream data received for {}ms",
                    idle.as_millis()
                )))),
                None,
            )),
        }
    }))
}

/// reqwest-backed transport posting JSON payloads to one endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout))
            .http2_adaptive_window(true)
            .http2_keep_alive_interval(Some(Duration::from_secs(30)))
            .http2_keep_alive_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::usage_with_context(
                    format!("Invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("transport.proxy")
                        .with_source("http_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            token: config.token,
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let mut req = self
            .client
            .post(self.endpoint.clone())
            .json(&request.payload)
            .header("x-request-id", request.request_id.as_str());

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = if request.stream {
            req = req.header("accept", "text/event-stream");
            tokio::time::timeout(self.timeout, req.send())
                .await
                .map_err(|_| {
                    TransportError::Timeout(format!(
                        "no response head within {}ms",
                        self.timeout.as_millis()
                    ))
                })?
                .map_err(TransportError::from)?
        } else {
            req.timeout(self.timeout)
                .send()
                .await
                .map_err(TransportError::from)?
        };

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Error statuses are always read whole so the error body can be classified.
        let body = if request.stream && resp.status().is_success() {
            let chunks = resp
                .bytes_stream()
                .map_err(|e| Error::Transport(TransportError::from(e)));
            ResponseBody::Chunks(with_idle_timeout(Box::pin(chunks), self.timeout))
        } else {
            let body = tokio::time::timeout(self.timeout, resp.bytes())
                .await
                .map_err(|_| TransportError::Timeout("response body not received in time".into()))?
                .map_err(TransportError::from)?;
            ResponseBody::Complete(body)
        };

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}
