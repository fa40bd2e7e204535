//! Wire-level tests for the Anthropic responder against a mock server.

use campus_desk::message::Message;
use campus_desk::responder::{AnthropicResponder, Responder, ResponderError};
use httpmock::prelude::*;
use serde_json::json;

fn responder_for(server: &MockServer) -> AnthropicResponder {
    AnthropicResponder::new("test-key")
        .expect("client builds")
        .with_base_url(server.base_url())
        .with_model("test-model")
}

#[tokio::test]
async fn sends_versioned_request_and_extracts_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .header("x-api-key", "test-key")
                .header("anthropic-version", "2023-06-01")
                .json_body_includes(r#"{"model":"test-model"}"#);
            then.status(200).json_body(json!({
                "content": [
                    {"type": "text", "text": "Welcome! "},
                    {"type": "text", "text": "INTENT: academic"}
                ]
            }));
        })
        .await;

    let responder = responder_for(&server);
    let reply = responder
        .complete(&[Message::system("classify"), Message::user("deadline?")])
        .await
        .expect("completion succeeds");

    assert_eq!(reply, "Welcome! INTENT: academic");
    mock.assert_async().await;
}

#[tokio::test]
async fn system_messages_land_in_the_system_field() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .json_body_includes(r#"{"system":"you are the greeter"}"#);
            then.status(200).json_body(json!({
                "content": [{"type": "text", "text": "ok"}]
            }));
        })
        .await;

    let responder = responder_for(&server);
    responder
        .complete(&[
            Message::system("you are the greeter"),
            Message::user("hello"),
        ])
        .await
        .expect("completion succeeds");

    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_surfaces_as_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(529).body("overloaded");
        })
        .await;

    let responder = responder_for(&server);
    let err = responder
        .complete(&[Message::user("hello")])
        .await
        .expect_err("status must propagate");

    match err {
        ResponderError::Api { status, body } => {
            assert_eq!(status, 529);
            assert!(body.contains("overloaded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn reply_without_text_blocks_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200).json_body(json!({ "content": [] }));
        })
        .await;

    let responder = responder_for(&server);
    let err = responder
        .complete(&[Message::user("hello")])
        .await
        .expect_err("empty content must not pass silently");

    assert!(matches!(err, ResponderError::EmptyReply));
}
