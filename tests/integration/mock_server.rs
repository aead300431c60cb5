//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use tgi_client_rust::TextGenerationClient;
use tokio::sync::Mutex;

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Client pointed at the mock server.
    ///
    /// Capabilities are cached per model id for the whole test process, so every test
    /// passes its own id.
    pub fn create_test_client(&self, model: &str) -> tgi_client_rust::Result<TextGenerationClient> {
        TextGenerationClient::builder()
            .base_url(&self.base_url)
            .model(model)
            .build()
    }

    /// Successful SSE response; each chunk becomes one `data:` frame.
    pub async fn mock_sse_stream(&self, chunks: Vec<&str>) -> Mock {
        let mut server = self.server.lock().await;
        let body = chunks
            .iter()
            .map(|chunk| {
                if chunk.starts_with("data:") || chunk.starts_with(':') {
                    format!("{}\n\n", chunk)
                } else {
                    format!("data: {}\n\n", chunk)
                }
            })
            .collect::<Vec<_>>()
            .join("");

        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(serde_json::json!({"stream": true})))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }

    /// JSON response for any POST to the root path.
    pub async fn mock_json_response(&self, status: u16, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", "/")
            .with_status(status as usize)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// JSON response for requests whose body matches `matcher`.
    pub async fn mock_json_matching(&self, matcher: Matcher, status: u16, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", "/")
            .match_body(matcher)
            .with_status(status as usize)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// A mock that must never be hit.
    pub async fn mock_never_called(&self) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(500)
            .expect(0)
            .create_async()
            .await
    }
}

/// Install a test subscriber once so `RUST_LOG` shows client logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory log sink for asserting on emitted warnings.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route warnings on the current thread into a [`CapturedLogs`] until the guard drops.
pub fn capture_warnings() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
