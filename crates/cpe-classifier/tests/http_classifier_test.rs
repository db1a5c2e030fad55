//! Contract tests for HttpClassifier against an OpenAI-compatible server.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/v1/chat/completions` | `classify_*`, `adapter_*` |

use std::sync::Arc;
use std::time::Duration;

use cpe_classifier::{
    ClassificationRequest, ClassifierAdapter, ClassifierConfig, ClassifierError, ClassifierOutput,
    HttpClassifier, SemanticClassifier,
};
use cpe_core::{Channel, ComplianceStatus, JurisdictionId};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(mock_server: &MockServer) -> ClassifierConfig {
    ClassifierConfig::local_mock(&format!("{}/v1", mock_server.uri()), "sk-test").unwrap()
}

fn request(content: &str) -> ClassificationRequest {
    ClassificationRequest {
        jurisdiction: JurisdictionId::new("NY").unwrap(),
        channel: Channel::retail(),
        content: content.to_string(),
    }
}

fn completion(message: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{ "index": 0, "message": message, "finish_reason": "stop" }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 20, "total_tokens": 140 }
    })
}

// ── POST /chat/completions ───────────────────────────────────────────

#[tokio::test]
async fn classify_sends_json_mode_request_with_bearer_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "response_format": { "type": "json_object" },
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(serde_json::json!({
            "role": "assistant",
            "content": "{\"status\":\"pass\",\"violations\":[],\"suggestions\":[]}"
        }))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let classifier = HttpClassifier::new(&test_config(&mock_server)).unwrap();
    let output = classifier.classify(&request("Open 9 to 5")).await.unwrap();
    match output {
        ClassifierOutput::Text(text) => assert!(text.contains("\"pass\"")),
        other => panic!("expected text output, got {other:?}"),
    }
}

#[tokio::test]
async fn classify_prefers_parsed_structured_output() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(serde_json::json!({
            "role": "assistant",
            "content": "ignored",
            "parsed": {
                "status": "fail",
                "violations": ["Implied health benefit"],
                "suggestions": ["Remove \"good for anxiety\""]
            }
        }))))
        .mount(&mock_server)
        .await;

    let classifier = HttpClassifier::new(&test_config(&mock_server)).unwrap();
    let output = classifier.classify(&request("good for anxiety")).await.unwrap();
    match output {
        ClassifierOutput::Structured(v) => assert_eq!(v["status"], "fail"),
        other => panic!("expected structured output, got {other:?}"),
    }
}

#[tokio::test]
async fn classify_handles_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .mount(&mock_server)
        .await;

    let classifier = HttpClassifier::new(&test_config(&mock_server)).unwrap();
    let err = classifier.classify(&request("x")).await.unwrap_err();
    match err {
        ClassifierError::ApiError { status, body, .. } => {
            assert_eq!(status, 503);
            assert!(body.contains("overloaded"));
        }
        other => panic!("expected ApiError, got {other}"),
    }
}

#[tokio::test]
async fn classify_handles_empty_choices() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": []
        })))
        .mount(&mock_server)
        .await;

    let classifier = HttpClassifier::new(&test_config(&mock_server)).unwrap();
    let err = classifier.classify(&request("x")).await.unwrap_err();
    assert!(matches!(err, ClassifierError::EmptyResponse));
}

#[tokio::test]
async fn classify_handles_non_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let classifier = HttpClassifier::new(&test_config(&mock_server)).unwrap();
    let err = classifier.classify(&request("x")).await.unwrap_err();
    assert!(matches!(err, ClassifierError::Deserialization { .. }));
}

// ── Adapter over HTTP ────────────────────────────────────────────────

#[tokio::test]
async fn adapter_returns_validated_classifier_verdict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(serde_json::json!({
            "role": "assistant",
            "content": "{\"status\":\"warning\",\"violations\":[\"Vague efficacy claim\"],\"suggestions\":[]}"
        }))))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server);
    let adapter = ClassifierAdapter::from_config(Some(&config)).unwrap();
    let r = adapter
        .classify(
            &JurisdictionId::new("NY").unwrap(),
            &Channel::retail(),
            "works wonders",
        )
        .await;
    assert_eq!(r.status, ComplianceStatus::Warning);
    assert_eq!(r.violations, vec!["Vague efficacy claim"]);
}

#[tokio::test]
async fn adapter_fails_closed_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server);
    let adapter = ClassifierAdapter::from_config(Some(&config)).unwrap();
    let r = adapter
        .classify(&JurisdictionId::new("CA").unwrap(), &Channel::retail(), "x")
        .await;
    assert_eq!(r.status, ComplianceStatus::Fail);
    assert!(r.violations[0].starts_with("Compliance check failed"));
    assert!(r.violations[0].contains("500"));
}

#[tokio::test]
async fn adapter_fails_closed_on_network_error() {
    let config = ClassifierConfig::local_mock("http://127.0.0.1:1/v1", "sk-test").unwrap();
    let provider = HttpClassifier::new(&config).unwrap();
    let adapter = ClassifierAdapter::new(Arc::new(provider), Duration::from_secs(10));
    let r = adapter
        .classify(&JurisdictionId::new("NY").unwrap(), &Channel::retail(), "x")
        .await;
    assert_eq!(r.status, ComplianceStatus::Fail);
    assert!(r.violations[0].starts_with("Compliance check failed"));
}

#[tokio::test]
async fn adapter_fails_closed_on_slow_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(completion(serde_json::json!({
                    "role": "assistant",
                    "content": "{\"status\":\"pass\",\"violations\":[],\"suggestions\":[]}"
                }))),
        )
        .mount(&mock_server)
        .await;

    let provider = HttpClassifier::new(&test_config(&mock_server)).unwrap();
    let adapter = ClassifierAdapter::new(Arc::new(provider), Duration::from_millis(200));
    let r = adapter
        .classify(&JurisdictionId::new("NY").unwrap(), &Channel::retail(), "x")
        .await;
    assert_eq!(r.status, ComplianceStatus::Fail);
    assert!(r.violations[0].contains("timed out"));
}
