// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Integration tests for the completion client and the generation pipeline.
//!
//! Uses `wiremock` to mock the chat completions endpoint so no real
//! service is needed.

mod helpers;

use std::time::Duration;

use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use commitmoji::config::Config;
use commitmoji::domain::{CompositeDiff, FileDiff};
use commitmoji::error::Error;
use commitmoji::services::generator::{FailureKind, MessageGenerator};
use commitmoji::services::llm::openai::OpenAiProvider;
use commitmoji::services::llm::{LlmProvider, create_provider};
use commitmoji::services::review::Notice;
use helpers::RecordingNotifier;

// ─── Test helpers ────────────────────────────────────────────────────────────

fn openai_config(server_url: &str) -> Config {
    Config {
        model: "gpt-4o-mini".into(),
        base_url: Some(format!("{server_url}/v1")),
        api_key: Some("test-key".into()),
        timeout_secs: 5,
        temperature: 0.3,
        max_tokens: 256,
        ..Config::default()
    }
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn sample_diff() -> CompositeDiff {
    CompositeDiff::new(vec![FileDiff::new(
        "src/parser.rs",
        "-    for i in 0..=len {\n+    for i in 0..len {\n",
    )])
}

// ─── OpenAI client ───────────────────────────────────────────────────────────

#[tokio::test]
async fn openai_sends_system_and_user_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "max_tokens": 256,
            "messages": [
                { "role": "system", "content": "be brief" },
                { "role": "user", "content": "describe this" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("fix: x")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    let text = provider.complete("be brief", "describe this").await.unwrap();
    assert_eq!(text, "fix: x");
}

#[tokio::test]
async fn openai_returns_first_choice_untrimmed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  docs: first\n" } },
                { "message": { "role": "assistant", "content": "docs: second" } }
            ]
        })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    let text = provider.complete("s", "p").await.unwrap();
    assert_eq!(text, "  docs: first\n");
}

#[tokio::test]
async fn openai_no_choices_is_empty_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    assert_eq!(provider.complete("s", "p").await.unwrap(), "");
}

#[tokio::test]
async fn openai_trailing_slash_in_base_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ci: x")))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        base_url: Some(format!("{}/v1/", server.uri())),
        ..openai_config(&server.uri())
    };
    let provider = OpenAiProvider::new(&config);
    assert_eq!(provider.complete("s", "p").await.unwrap(), "ci: x");
}

#[tokio::test]
async fn openai_missing_key_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("fix: x")))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        api_key: None,
        ..openai_config(&server.uri())
    };
    let err = OpenAiProvider::new(&config)
        .complete("s", "p")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingCredential));
}

#[tokio::test]
async fn openai_unauthorized_carries_service_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    let err = provider.complete("s", "p").await.unwrap_err();

    match &err {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "openai");
            assert!(message.contains("401"), "got: {message}");
            assert!(message.contains("Incorrect API key provided"), "got: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(FailureKind::classify(&err), FailureKind::Credential);
}

#[tokio::test]
async fn openai_server_error_keeps_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    let err = provider.complete("s", "p").await.unwrap_err();

    assert!(err.to_string().contains("Internal Server Error"));
    assert_eq!(FailureKind::classify(&err), FailureKind::Other);
}

#[tokio::test]
async fn openai_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("fix: late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = Config {
        timeout_secs: 1,
        ..openai_config(&server.uri())
    };
    let err = OpenAiProvider::new(&config)
        .complete("s", "p")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got: {err:?}");
}

#[tokio::test]
async fn openai_unreachable_is_network_failure() {
    // Nothing listens on port 1
    let provider = OpenAiProvider::new(&openai_config("http://127.0.0.1:1"));
    let err = provider.complete("s", "p").await.unwrap_err();
    assert_eq!(FailureKind::classify(&err), FailureKind::Network);
}

// ─── Full pipeline: provider → generator → sanitizer ─────────────────────────

#[tokio::test]
async fn pipeline_decorates_service_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("```\nfix(parser): correct off-by-one\n```")),
        )
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::new();
    let generator = MessageGenerator::new(
        create_provider(&openai_config(&server.uri())),
        notifier.clone(),
    );

    let message = generator.generate(&sample_diff()).await;
    assert_eq!(message.text, "🐛 fix(parser): correct off-by-one");
    assert!(notifier.notices().is_empty());

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains(&sample_diff().render()));
}

#[tokio::test]
async fn pipeline_falls_back_on_rejected_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::new();
    let generator = MessageGenerator::new(
        create_provider(&openai_config(&server.uri())),
        notifier.clone(),
    );

    let message = generator.generate(&sample_diff()).await;
    assert_eq!(message.text, "✨ feat: update code changes");
    assert!(matches!(
        notifier.notices().as_slice(),
        [Notice::GenerationFailed {
            kind: FailureKind::Credential,
            ..
        }]
    ));
}
