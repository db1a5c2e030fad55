//! OpenAI-compatible HTTP classifier.
//!
//! Calls `POST {endpoint}/chat/completions` in JSON mode at temperature 0.
//! Works with any server speaking the chat-completions protocol.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ClassifierConfig, ConfigError};
use crate::error::ClassifierError;
use crate::prompt;
use crate::retry::RetryPolicy;
use crate::{ClassificationRequest, ClassifierOutput, SemanticClassifier};

const ENDPOINT: &str = "POST /chat/completions";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
    /// Present when the server performed structured-output parsing.
    #[serde(default)]
    parsed: Option<Value>,
}

/// Classifier backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    http: reqwest::Client,
    url: String,
    model: String,
    retry: RetryPolicy,
}

impl HttpClassifier {
    /// Create a classifier from configuration.
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut value = reqwest::header::HeaderValue::from_str(&format!(
                    "Bearer {}",
                    config.api_key.as_str()
                ))
                .map_err(|_| ClassifierError::Config(ConfigError::InvalidApiKey))?;
                value.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, value);
                headers
            })
            .build()
            .map_err(|e| ClassifierError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            url: format!(
                "{}/chat/completions",
                config.endpoint.as_str().trim_end_matches('/')
            ),
            model: config.model.clone(),
            retry: RetryPolicy::within(config.timeout()),
        })
    }
}

#[async_trait]
impl SemanticClassifier for HttpClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassifierOutput, ClassifierError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt::SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt::user_message(request),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.0,
        };

        let resp = self
            .retry
            .send(|| self.http.post(&self.url).json(&body).send())
            .await
            .map_err(|e| ClassifierError::Http {
                endpoint: ENDPOINT.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(ClassifierError::ApiError {
                endpoint: ENDPOINT.into(),
                status,
                body,
            });
        }

        let parsed: ChatResponse =
            resp.json()
                .await
                .map_err(|e| ClassifierError::Deserialization {
                    endpoint: ENDPOINT.into(),
                    source: e,
                })?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(ClassifierError::EmptyResponse)?;

        match (reply.parsed, reply.content) {
            (Some(structured), _) if structured.is_object() => {
                Ok(ClassifierOutput::Structured(structured))
            }
            (_, Some(text)) => Ok(ClassifierOutput::Text(text)),
            _ => Err(ClassifierError::EmptyResponse),
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
