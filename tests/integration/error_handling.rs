//! Integration tests for server error bodies

use crate::mock_server::MockServerFixture;
use tgi_client_rust::transport::TransportError;
use tgi_client_rust::{Error, GenerationParameters, ServerErrorKind};

#[tokio::test]
async fn test_server_validation_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(
            422,
            r#"{"error":"Input validation error: `inputs` tokens + `max_new_tokens` must be <= 2048","error_type":"validation"}"#,
        )
        .await;

    let client = fixture.create_test_client("errors/validation").unwrap();
    let err = client
        .generate_text("test", Some(GenerationParameters::new().max_new_tokens(4096)))
        .await
        .unwrap_err();

    assert_eq!(err.server_kind(), Some(ServerErrorKind::Validation));
    assert_eq!(
        err.server_message(),
        Some("Input validation error: `inputs` tokens + `max_new_tokens` must be <= 2048")
    );
    // Same category as a client-side parameter failure.
    let client_side = client
        .generate_text("test", Some(GenerationParameters::new().top_k(0)))
        .await
        .unwrap_err();
    assert_eq!(err.category(), client_side.category());
}

#[tokio::test]
async fn test_overloaded_is_retryable() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(429, r#"{"error":"Model is overloaded","error_type":"overloaded"}"#)
        .await;

    let client = fixture.create_test_client("errors/overloaded").unwrap();
    let err = client.generate_text("test", None).await.unwrap_err();
    assert!(matches!(err, Error::Overloaded(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_each_error_type_maps_to_its_kind() {
    for kind in ServerErrorKind::ALL {
        let fixture = MockServerFixture::new().await;
        let body = serde_json::json!({"error": "boom", "error_type": kind.name()}).to_string();
        let _mock = fixture.mock_json_response(500, &body).await;

        let client = fixture
            .create_test_client(&format!("errors/kind-{}", kind.name()))
            .unwrap();
        let err = client.generate_text("test", None).await.unwrap_err();
        assert_eq!(err.server_kind(), Some(kind));
        assert_eq!(err.server_message(), Some("boom"));
        assert_eq!(err.is_retryable(), kind == ServerErrorKind::Overloaded);
    }
}

#[tokio::test]
async fn test_unknown_error_type_is_generation_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(500, r#"{"error":"CUDA out of memory","error_type":"cuda"}"#)
        .await;

    let client = fixture.create_test_client("errors/unknown").unwrap();
    let err = client.generate_text("test", None).await.unwrap_err();
    assert!(matches!(err, Error::Generation(ref m) if m == "CUDA out of memory"));
}

#[tokio::test]
async fn test_error_body_on_streaming_call() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(
            503,
            r#"{"error":"Request failed during generation","error_type":"incomplete_generation"}"#,
        )
        .await;

    let client = fixture.create_test_client("errors/stream").unwrap();
    let err = client.generate_stream("test", None).await.unwrap_err();
    assert!(matches!(err, Error::IncompleteGeneration(_)));
}

#[tokio::test]
async fn test_unclassifiable_error_body_is_a_status_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json_response(502, "Bad Gateway").await;

    let client = fixture.create_test_client("errors/status").unwrap();
    let err = client.generate_text("test", None).await.unwrap_err();
    match err {
        Error::Transport(TransportError::Status { status, ref body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}
