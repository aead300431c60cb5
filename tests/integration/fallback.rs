//! Integration tests for fallback mode

use crate::mock_server::{capture_warnings, MockServerFixture};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use tgi_client_rust::client::capability::{self, CapabilityProbe};
use tgi_client_rust::{
    ClientMode, Error, GenerationParameters, TextGenerationClient, TextGenerationOutput,
};

struct NeverNative;

#[async_trait::async_trait]
impl CapabilityProbe for NeverNative {
    async fn supports_native_protocol(&self, _model_id: &str) -> tgi_client_rust::Result<bool> {
        Ok(false)
    }
}

fn fallback_client(fixture: &MockServerFixture, model: &str) -> TextGenerationClient {
    TextGenerationClient::builder()
        .base_url(&fixture.base_url)
        .model(model)
        .with_probe(Arc::new(NeverNative))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_model_kwargs_rejection_switches_to_fallback() {
    let fixture = MockServerFixture::new().await;
    let (native, generic) = {
        let mut server = fixture.server.lock().await;
        let native = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"stream": false})))
            .with_status(400)
            .with_body(r#"{"error":"The following `model_kwargs` are not used by the model: ['stream', 'details'] (note: typos in the generate arguments will also show up in this list)"}"#)
            .expect(1)
            .create_async()
            .await;
        let generic = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!({
                "inputs": "0 1 2",
                "parameters": {"max_new_tokens": 10}
            })))
            .with_status(200)
            .with_body(r#"[{"generated_text":" 3 4 5"}]"#)
            .expect(2)
            .create_async()
            .await;
        (native, generic)
    };

    let model = "fallback/learned";
    let client = fixture.create_test_client(model).unwrap();
    assert_eq!(client.mode().await.unwrap(), ClientMode::Native);

    let output = client
        .generate_text("0 1 2", Some(GenerationParameters::new().max_new_tokens(10)))
        .await
        .unwrap();
    assert_eq!(output, TextGenerationOutput::Text(" 3 4 5".into()));
    assert!(capability::is_known_non_native(model));
    assert_eq!(client.mode().await.unwrap(), ClientMode::Fallback);

    // Second call goes straight to the generic shape.
    let output = client
        .generate_text("0 1 2", Some(GenerationParameters::new().max_new_tokens(10)))
        .await
        .unwrap();
    assert_eq!(output.text(), " 3 4 5");

    native.assert_async().await;
    generic.assert_async().await;
}

#[tokio::test]
async fn test_fallback_stream_is_a_usage_error_without_network() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_never_called().await;

    let client = fallback_client(&fixture, "fallback/stream");
    for params in [None, Some(GenerationParameters::new().watermark(true).details(true))] {
        let err = client.generate_stream("0 1 2", params).await.unwrap_err();
        assert!(matches!(err, Error::Usage { .. }));
        assert_eq!(err.category(), "usage");
        assert!(!err.is_retryable());
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fallback_ignores_unsupported_parameters() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_matching(
            Matcher::Json(json!({"inputs": "Hello", "parameters": {"temperature": 0.7}})),
            200,
            r#"[{"generated_text":"Hello there"}]"#,
        )
        .await;

    let (logs, _guard) = capture_warnings();
    let client = fallback_client(&fixture, "fallback/watermark");
    let output = client
        .generate_text(
            "Hello",
            Some(
                GenerationParameters::new()
                    .watermark(true)
                    .details(true)
                    .temperature(0.7),
            ),
        )
        .await
        .unwrap();
    assert_eq!(output, TextGenerationOutput::Text("Hello there".into()));
    assert!(output.details().is_none());
    mock.assert_async().await;

    let logs = logs.contents();
    assert!(logs.contains("WARN"), "no warning emitted: {}", logs);
    assert!(logs.contains("parameters not supported in fallback mode were ignored"));
    assert!(logs.contains("\"details\""));
    assert!(logs.contains("\"watermark\""));
    assert!(!logs.contains("\"temperature\""));
    assert!(logs.contains("details are not available in fallback mode"));
}

#[tokio::test]
async fn test_fallback_error_body_is_classified() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(503, r#"{"error":"Model is overloaded","error_type":"overloaded"}"#)
        .await;

    let client = fallback_client(&fixture, "fallback/overloaded");
    let err = client.generate_text("Hello", None).await.unwrap_err();
    assert!(matches!(err, Error::Overloaded(ref m) if m == "Model is overloaded"));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_pinned_mode_skips_probe() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(200, r#"[{"generated_text":"pinned"}]"#)
        .await;

    let client = TextGenerationClient::builder()
        .base_url(&fixture.base_url)
        .model("fallback/pinned")
        .with_probe(Arc::new(NeverNative))
        .mode(ClientMode::Native)
        .build()
        .unwrap();
    assert_eq!(client.mode().await.unwrap(), ClientMode::Native);
    assert_eq!(client.generate_text("x", None).await.unwrap().text(), "pinned");
    assert!(!capability::is_known_non_native("fallback/pinned"));
}
