//! Integration tests for streaming responses

use crate::mock_server::MockServerFixture;
use futures::{StreamExt, TryStreamExt};
use tgi_client_rust::{Error, GenerationParameters};

const TOKEN_1: &str = r#"{"token":{"id":9707,"text":"Hello","logprob":-0.3,"special":false},"generated_text":null,"details":null}"#;
const TOKEN_2: &str = r#"{"token":{"id":1879,"text":" world","logprob":-0.7,"special":false},"generated_text":null,"details":null}"#;
const FINAL: &str = r#"{"token":{"id":2,"text":"</s>","logprob":-0.01,"special":true},"generated_text":"Hello world","details":{"finish_reason":"eos_token","generated_tokens":3,"seed":null}}"#;

#[tokio::test]
async fn test_sse_streaming_response() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_sse_stream(vec![":ping", TOKEN_1, TOKEN_2, FINAL])
        .await;

    let client = fixture.create_test_client("streaming/sse").unwrap();
    let stream = client
        .generate_stream("Say hello", Some(GenerationParameters::new().max_new_tokens(3)))
        .await
        .unwrap();
    assert!(!stream.request_id().is_empty());

    let events: Vec<_> = stream.try_collect().await.unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].token.text, "Hello");
    assert_eq!(events[1].token.text, " world");
    assert!(!events[0].is_terminal());
    assert!(events[2].is_terminal());
    assert_eq!(events[2].generated_text.as_deref(), Some("Hello world"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stream_text_skips_special_tokens() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_sse_stream(vec![TOKEN_1, TOKEN_2, FINAL]).await;

    let client = fixture.create_test_client("streaming/text").unwrap();
    let texts: Vec<String> = client
        .generate_stream("Say hello", None)
        .await
        .unwrap()
        .into_text()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(texts.concat(), "Hello world");
}

#[tokio::test]
async fn test_collect_response() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_sse_stream(vec![TOKEN_1, TOKEN_2, FINAL, "[DONE]"]).await;

    let client = fixture.create_test_client("streaming/collect").unwrap();
    let collected = client
        .text_generation("Say hello")
        .execute_stream()
        .await
        .unwrap()
        .collect_response()
        .await
        .unwrap();
    assert_eq!(collected.generated_text, "Hello world");
    assert_eq!(collected.tokens.len(), 3);
    assert_eq!(collected.details.unwrap().generated_tokens, 3);
}

#[tokio::test]
async fn test_error_frame_after_tokens() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse_stream(vec![
            TOKEN_1,
            r#"{"error":"Request failed during generation: Server error: Out of available cache blocks","error_type":"generation"}"#,
        ])
        .await;

    let client = fixture.create_test_client("streaming/error-frame").unwrap();
    let mut stream = client.generate_stream("Say hello", None).await.unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.token.text, "Hello");
    match stream.next().await {
        Some(Err(Error::Generation(msg))) => assert_eq!(
            msg,
            "Request failed during generation: Server error: Out of available cache blocks"
        ),
        other => panic!("expected a generation error, got {:?}", other),
    }
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_stream_closed_without_final_event() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_sse_stream(vec![TOKEN_1, TOKEN_2]).await;

    let client = fixture.create_test_client("streaming/truncated").unwrap();
    let results: Vec<_> = client
        .generate_stream("Say hello", None)
        .await
        .unwrap()
        .collect()
        .await;
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(Error::IncompleteGeneration(_))));
}

#[tokio::test]
async fn test_ndjson_streaming() {
    let fixture = MockServerFixture::new().await;
    let body = format!("{}\n{}\n{}\n", TOKEN_1, TOKEN_2, FINAL);
    let _mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/x-ndjson")
            .with_body(body)
            .create_async()
            .await
    };

    let client = fixture.create_test_client("streaming/ndjson").unwrap();
    let events: Vec<_> = client
        .generate_stream("Say hello", None)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(events.len(), 3);
    assert!(events[2].is_terminal());
}

#[tokio::test]
async fn test_streaming_rejects_decoder_input_details_before_sending() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_never_called().await;

    let client = fixture.create_test_client("streaming/rejected").unwrap();
    let err = client
        .generate_stream(
            "Say hello",
            Some(GenerationParameters::new().decoder_input_details(true)),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidParameter { ref field, .. } if field == "decoder_input_details"
    ));
    mock.assert_async().await;
}
