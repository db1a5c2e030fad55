//! # Fail-Closed Semantic Stage
//!
//! End-to-end through `ComplianceEngine` with a real `HttpClassifier`
//! pointed at a `wiremock` server (or at nothing). Every way the classifier
//! can go wrong must yield a `fail` result carrying the system-error
//! violation, never an error and never a `pass`.

use std::sync::Arc;
use std::time::Duration;

use cpe_classifier::{ClassifierAdapter, ClassifierConfig};
use cpe_core::{ComplianceResult, ComplianceStatus, SYSTEM_ERROR_PREFIX};
use cpe_engine::{ComplianceEngine, Denylist};
use cpe_pack::{PackRegistry, RulePackStore};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(config: Option<&ClassifierConfig>) -> ComplianceEngine {
    ComplianceEngine::new(
        Arc::new(PackRegistry::new(RulePackStore::builtin().unwrap())),
        ClassifierAdapter::from_config(config).unwrap(),
        Denylist::default(),
    )
}

fn config_for(server: &MockServer, timeout_secs: u64) -> ClassifierConfig {
    let mut cfg =
        ClassifierConfig::local_mock(&format!("{}/v1", server.uri()), "sk-test").unwrap();
    cfg.timeout_secs = timeout_secs;
    cfg
}

fn completion_with_content(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

fn assert_fail_safe(r: &ComplianceResult) {
    assert_eq!(r.status, ComplianceStatus::Fail, "got {r:?}");
    assert_eq!(r.violations.len(), 1);
    assert!(r.violations[0].starts_with(SYSTEM_ERROR_PREFIX), "got {r:?}");
    assert!(!r.suggestions.is_empty());
}

const CLEAN: &str = "Open until 9pm tonight";

#[tokio::test]
async fn well_formed_pass_goes_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_content(
            "{\"status\":\"pass\",\"violations\":[],\"suggestions\":[]}",
        )))
        .mount(&server)
        .await;

    let engine = engine_for(Some(&config_for(&server, 5)));
    let r = engine.check_content("NY", "retail", CLEAN).await;
    assert_eq!(r, ComplianceResult::pass());
}

#[tokio::test]
async fn fenced_json_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_content(
            "Here you go:\n```json\n{\"status\":\"fail\",\"violations\":[\"Implied health benefit\"],\"suggestions\":[]}\n```",
        )))
        .mount(&server)
        .await;

    let engine = engine_for(Some(&config_for(&server, 5)));
    let r = engine.check_content("CA", "retail", CLEAN).await;
    assert_eq!(r.status, ComplianceStatus::Fail);
    assert_eq!(r.violations, vec!["Implied health benefit"]);
}

#[tokio::test]
async fn network_failure_fails_closed() {
    // Nothing listens on port 1.
    let cfg = ClassifierConfig::local_mock("http://127.0.0.1:1/v1", "sk-test").unwrap();
    let engine = engine_for(Some(&cfg));

    let r = engine.check_content("NY", "retail", CLEAN).await;
    assert_fail_safe(&r);
}

#[tokio::test]
async fn server_error_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let engine = engine_for(Some(&config_for(&server, 5)));
    assert_fail_safe(&engine.check_content("NY", "retail", CLEAN).await);
}

#[tokio::test]
async fn prose_answer_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_with_content("Looks fine to me!")),
        )
        .mount(&server)
        .await;

    let engine = engine_for(Some(&config_for(&server, 5)));
    assert_fail_safe(&engine.check_content("NY", "retail", CLEAN).await);
}

#[tokio::test]
async fn schema_invalid_answer_fails_closed() {
    let server = MockServer::start().await;
    // A pass that lists violations is contradictory and rejected.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_content(
            "{\"status\":\"pass\",\"violations\":[\"x\"],\"suggestions\":[]}",
        )))
        .mount(&server)
        .await;

    let engine = engine_for(Some(&config_for(&server, 5)));
    assert_fail_safe(&engine.check_content("NY", "retail", CLEAN).await);
}

#[tokio::test]
async fn unknown_status_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_content(
            "{\"status\":\"maybe\",\"violations\":[],\"suggestions\":[]}",
        )))
        .mount(&server)
        .await;

    let engine = engine_for(Some(&config_for(&server, 5)));
    assert_fail_safe(&engine.check_content("NY", "retail", CLEAN).await);
}

#[tokio::test]
async fn slow_classifier_times_out_and_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_with_content(
                    "{\"status\":\"pass\",\"violations\":[],\"suggestions\":[]}",
                ))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let engine = engine_for(Some(&config_for(&server, 1)));
    let started = std::time::Instant::now();
    let r = engine.check_content("NY", "retail", CLEAN).await;
    assert_fail_safe(&r);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn cancellation_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_with_content(
                    "{\"status\":\"pass\",\"violations\":[],\"suggestions\":[]}",
                ))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let engine = engine_for(Some(&config_for(&server, 10)));
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let r = engine
        .check_content_with_cancel("NY", "retail", CLEAN, token)
        .await;
    assert_fail_safe(&r);
}

#[tokio::test]
async fn unconfigured_classifier_fails_closed() {
    let engine = engine_for(None);
    assert_fail_safe(&engine.check_content("NY", "retail", CLEAN).await);
}

#[tokio::test]
async fn fast_path_still_works_without_classifier() {
    let engine = engine_for(None);
    let r = engine.check_content("NY", "retail", "guaranteed relief").await;
    assert_eq!(r.status, ComplianceStatus::Fail);
    assert!(!r.violations[0].starts_with(SYSTEM_ERROR_PREFIX));
}
