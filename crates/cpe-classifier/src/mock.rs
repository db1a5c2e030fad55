//! In-process scripted classifier for tests and offline tooling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClassifierError;
use crate::{ClassificationRequest, ClassifierOutput, SemanticClassifier};

/// What a [`MockClassifier`] answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Structured output.
    Structured(Value),
    /// Free text output.
    Text(String),
    /// A provider error with this message.
    Error(String),
    /// Panic inside the provider call.
    Panic,
}

/// A classifier that returns a fixed response and counts its calls.
#[derive(Debug)]
pub struct MockClassifier {
    response: MockResponse,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockClassifier {
    /// Answer with `response` on every call.
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answer with a structured `pass`.
    pub fn passing() -> Self {
        Self::new(MockResponse::Structured(serde_json::json!({
            "status": "pass",
            "violations": [],
            "suggestions": []
        })))
    }

    /// Always answer with structured output `value`.
    pub fn structured(value: Value) -> Self {
        Self::new(MockResponse::Structured(value))
    }

    /// Always answer with free text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MockResponse::Text(text.into()))
    }

    /// Always fail with a provider error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockResponse::Error(message.into()))
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times [`SemanticClassifier::classify`] has been entered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SemanticClassifier for MockClassifier {
    async fn classify(
        &self,
        _request: &ClassificationRequest,
    ) -> Result<ClassifierOutput, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.response {
            MockResponse::Structured(v) => Ok(ClassifierOutput::Structured(v.clone())),
            MockResponse::Text(t) => Ok(ClassifierOutput::Text(t.clone())),
            MockResponse::Error(msg) => Err(ClassifierError::Provider(msg.clone())),
            MockResponse::Panic => panic!("mock classifier panicked"),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
