use std::sync::Arc;
use std::time::Duration;

use ace_motivation::ai::{
    AiAdvisor, ChatCompletion, ChatMessage, CompletionError, CompletionRequest,
    ExpertEvaluationInput, HttpCompletionClient,
};
use ace_motivation::assessment::DimensionScores;
use ace_motivation::config::AiConfig;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn config_for(server: &MockServer, api_key: Option<&str>) -> AiConfig {
    AiConfig {
        endpoint: format!("{}{COMPLETIONS_PATH}", server.uri()),
        api_key: api_key.map(str::to_string),
        model: "test-model".to_string(),
        timeout_ms: 200,
    }
}

fn advisor_for(config: &AiConfig) -> AiAdvisor<HttpCompletionClient> {
    let client = HttpCompletionClient::new(config).expect("client builds");
    AiAdvisor::new(Arc::new(client), config)
}

fn evaluation_input() -> ExpertEvaluationInput {
    ExpertEvaluationInput {
        student_name: "Lena".to_string(),
        student_ace: DimensionScores::new(18, 11, 14),
        parent_ace: DimensionScores::new(10, 12, 9),
        observation: None,
        student_motivation_type: None,
        parent_motivation_type: None,
    }
}

fn success_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

#[tokio::test]
async fn successful_completion_is_returned_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", "Bearer secret-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 800
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("  Keep going!  ")))
        .expect(1)
        .mount(&server)
        .await;

    let advisor = advisor_for(&config_for(&server, Some("secret-key")));
    let reply = advisor
        .chat(&[ChatMessage::user("hi")], None)
        .await;

    assert!(!reply.degraded);
    assert_eq!(reply.text, "Keep going!");
    assert_eq!(reply.fallback_reason, None);
}

#[tokio::test]
async fn server_error_yields_templated_evaluation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let reply = advisor_for(&config_for(&server, Some("secret-key")))
        .expert_evaluation(&evaluation_input())
        .await;

    assert!(reply.degraded);
    assert_eq!(reply.fallback_reason.as_deref(), Some("http_status"));
    assert!(reply
        .text
        .contains("**Autonomy**: student 18, parent 10, difference 8 (large difference)"));
    assert!(reply
        .text
        .contains("**Engagement**: student 14, parent 9, difference 5 (moderate difference)"));
}

#[tokio::test]
async fn malformed_and_empty_bodies_fall_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let advisor = advisor_for(&config_for(&server, Some("secret-key")));
    let conversation = [ChatMessage::user("tell me about motivation")];

    let malformed = advisor.chat(&conversation, None).await;
    assert!(malformed.degraded);
    assert_eq!(malformed.fallback_reason.as_deref(), Some("malformed_response"));
    assert!(!malformed.text.is_empty());

    let empty = advisor.chat(&conversation, None).await;
    assert_eq!(empty.fallback_reason.as_deref(), Some("empty_response"));
    assert!(!empty.text.is_empty());
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body("late"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let reply = advisor_for(&config_for(&server, Some("secret-key")))
        .chat(&[ChatMessage::user("hello")], None)
        .await;

    assert!(reply.degraded);
    assert_eq!(reply.fallback_reason.as_deref(), Some("timeout"));
}

#[tokio::test]
async fn missing_api_key_never_calls_the_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&server, None);
    let client = HttpCompletionClient::new(&config).expect("client builds");
    assert!(!client.is_configured());

    let request = CompletionRequest::new(
        "test-model",
        vec![ChatMessage::user("hi")],
        ace_motivation::ai::types::CHAT_SETTINGS,
    );
    match client.complete(&request).await {
        Err(CompletionError::NotConfigured) => {}
        other => panic!("expected NotConfigured, got {other:?}"),
    }

    let advisor = AiAdvisor::new(Arc::new(client), &config);
    assert!(!advisor.check_connection().await);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_failure() {
    let config = AiConfig {
        endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
        api_key: Some("secret-key".to_string()),
        model: "test-model".to_string(),
        timeout_ms: 500,
    };

    let reply = advisor_for(&config)
        .chat(&[ChatMessage::user("hello")], None)
        .await;

    assert!(reply.degraded);
    assert!(matches!(
        reply.fallback_reason.as_deref(),
        Some("transport") | Some("timeout")
    ));
    assert!(!reply.text.is_empty());
}
