//! # Classifier Adapter
//!
//! Wraps a [`SemanticClassifier`] so that every classification resolves to a
//! well-formed [`ComplianceResult`].
//!
//! The provider call runs in its own task under a timeout and an optional
//! cancellation token. Its output is parsed (text) or taken as is
//! (structured), then checked by [`validate_result`]. Any failure along the
//! way (no provider, transport error, non-2xx, timeout, cancellation,
//! panic, unparsable text, schema rejection) yields
//! [`ComplianceResult::system_error`]. The adapter never reports `pass` for
//! content it could not verify.

use std::sync::Arc;
use std::time::Duration;

use cpe_core::{validate_result, Channel, ComplianceResult, JurisdictionId};
use tokio_util::sync::CancellationToken;

use crate::config::{ClassifierConfig, DEFAULT_TIMEOUT_SECS};
use crate::error::ClassifierError;
use crate::http::HttpClassifier;
use crate::prompt;
use crate::{ClassificationRequest, ClassifierOutput, SemanticClassifier};

/// Fail-closed front end to a semantic classifier.
#[derive(Clone)]
pub struct ClassifierAdapter {
    provider: Option<Arc<dyn SemanticClassifier>>,
    timeout: Duration,
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClassifierAdapter {
    /// Wrap `provider` with the given per-call bound.
    pub fn new(provider: Arc<dyn SemanticClassifier>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
        }
    }

    /// An adapter with no provider. Every call fails closed.
    pub fn unconfigured() -> Self {
        Self {
            provider: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build from optional configuration: an [`HttpClassifier`] when
    /// configured, [`ClassifierAdapter::unconfigured`] otherwise.
    pub fn from_config(config: Option<&ClassifierConfig>) -> Result<Self, ClassifierError> {
        match config {
            Some(cfg) => {
                let provider = HttpClassifier::new(cfg)?;
                tracing::info!(
                    endpoint = %cfg.endpoint,
                    model = %cfg.model,
                    timeout_secs = cfg.timeout_secs,
                    "semantic classifier configured"
                );
                Ok(Self::new(Arc::new(provider), cfg.timeout()))
            }
            None => {
                tracing::warn!("no semantic classifier configured; semantic checks will fail closed");
                Ok(Self::unconfigured())
            }
        }
    }

    /// Whether a provider is attached.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// The per-call bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Classify `content`. Never fails; see the module docs.
    pub async fn classify(
        &self,
        jurisdiction: &JurisdictionId,
        channel: &Channel,
        content: &str,
    ) -> ComplianceResult {
        self.classify_with_cancel(jurisdiction, channel, content, CancellationToken::new())
            .await
    }

    /// Classify `content`, resolving to the fail-safe result if `cancel`
    /// fires first.
    pub async fn classify_with_cancel(
        &self,
        jurisdiction: &JurisdictionId,
        channel: &Channel,
        content: &str,
        cancel: CancellationToken,
    ) -> ComplianceResult {
        let request = ClassificationRequest {
            jurisdiction: jurisdiction.clone(),
            channel: channel.clone(),
            content: content.to_string(),
        };
        match self.try_classify(request, cancel).await {
            Ok(result) => {
                tracing::debug!(
                    %jurisdiction,
                    %channel,
                    status = %result.status,
                    violations = result.violations.len(),
                    "semantic classification complete"
                );
                result
            }
            Err(e) => {
                tracing::error!(
                    %jurisdiction,
                    %channel,
                    content_len = content.len(),
                    error = %e,
                    "semantic classification failed, failing closed"
                );
                ComplianceResult::system_error(e)
            }
        }
    }

    async fn try_classify(
        &self,
        request: ClassificationRequest,
        cancel: CancellationToken,
    ) -> Result<ComplianceResult, ClassifierError> {
        let provider = self
            .provider
            .as_ref()
            .map(Arc::clone)
            .ok_or(ClassifierError::NotConfigured)?;

        let mut handle = tokio::spawn(async move { provider.classify(&request).await });

        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            res = tokio::time::timeout(self.timeout, &mut handle) => Some(res),
        };

        let output = match joined {
            None => {
                handle.abort();
                return Err(ClassifierError::Cancelled);
            }
            Some(Err(_elapsed)) => {
                handle.abort();
                return Err(ClassifierError::Timeout(self.timeout));
            }
            Some(Ok(Err(join_err))) => {
                return Err(ClassifierError::TaskFailed(join_err.to_string()));
            }
            Some(Ok(Ok(result))) => result?,
        };

        let value = match output {
            ClassifierOutput::Structured(v) => v,
            ClassifierOutput::Text(text) => prompt::extract_json(&text).ok_or_else(|| {
                ClassifierError::Malformed(format!("no JSON object in {} bytes of text", text.len()))
            })?,
        };

        Ok(validate_result(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockClassifier, MockResponse};
    use cpe_core::{ComplianceStatus, SYSTEM_ERROR_PREFIX};
    use serde_json::json;

    fn ids() -> (JurisdictionId, Channel) {
        (JurisdictionId::new("NY").unwrap(), Channel::retail())
    }

    fn adapter(mock: Arc<MockClassifier>) -> ClassifierAdapter {
        ClassifierAdapter::new(mock, Duration::from_secs(2))
    }

    fn assert_fail_closed(result: &ComplianceResult, needle: &str) {
        assert_eq!(result.status, ComplianceStatus::Fail);
        assert_eq!(result.violations.len(), 1);
        assert!(
            result.violations[0].starts_with(SYSTEM_ERROR_PREFIX),
            "{:?}",
            result.violations
        );
        assert!(
            result.violations[0].contains(needle),
            "expected {needle:?} in {:?}",
            result.violations
        );
        assert!(!result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn structured_output_used_as_is() {
        let mock = Arc::new(MockClassifier::structured(json!({
            "status": "warning",
            "violations": ["Borderline wellness language"],
            "suggestions": ["Remove \"wellness\""]
        })));
        let (j, c) = ids();
        let r = adapter(mock.clone()).classify(&j, &c, "wellness blend").await;
        assert_eq!(r.status, ComplianceStatus::Warning);
        assert_eq!(r.violations, vec!["Borderline wellness language"]);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn text_output_is_parsed() {
        let mock = Arc::new(MockClassifier::text(
            "```json\n{\"status\":\"pass\",\"violations\":[],\"suggestions\":[]}\n```",
        ));
        let (j, c) = ids();
        let r = adapter(mock).classify(&j, &c, "Open 9 to 5").await;
        assert_eq!(r, ComplianceResult::pass());
    }

    #[tokio::test]
    async fn unparsable_text_fails_closed() {
        let mock = Arc::new(MockClassifier::text("Looks fine to me!"));
        let (j, c) = ids();
        let r = adapter(mock).classify(&j, &c, "x").await;
        assert_fail_closed(&r, "not valid JSON");
    }

    #[tokio::test]
    async fn schema_invalid_output_fails_closed() {
        let mock = Arc::new(MockClassifier::structured(json!({
            "status": "pass",
            "violations": []
        })));
        let (j, c) = ids();
        let r = adapter(mock).classify(&j, &c, "x").await;
        assert_fail_closed(&r, "suggestions");
    }

    #[tokio::test]
    async fn pass_with_violations_fails_closed() {
        let mock = Arc::new(MockClassifier::structured(json!({
            "status": "pass",
            "violations": ["but actually bad"],
            "suggestions": []
        })));
        let (j, c) = ids();
        let r = adapter(mock).classify(&j, &c, "x").await;
        assert_fail_closed(&r, "rejected");
    }

    #[tokio::test]
    async fn provider_error_fails_closed() {
        let mock = Arc::new(MockClassifier::failing("connection reset"));
        let (j, c) = ids();
        let r = adapter(mock).classify(&j, &c, "x").await;
        assert_fail_closed(&r, "connection reset");
    }

    #[tokio::test]
    async fn timeout_fails_closed() {
        let mock = Arc::new(MockClassifier::passing().with_delay(Duration::from_secs(5)));
        let a = ClassifierAdapter::new(mock.clone(), Duration::from_millis(50));
        let (j, c) = ids();
        let r = a.classify(&j, &c, "x").await;
        assert_fail_closed(&r, "timed out");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn cancellation_fails_closed() {
        let mock = Arc::new(MockClassifier::passing().with_delay(Duration::from_secs(5)));
        let a = adapter(mock);
        let (j, c) = ids();
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });
        let r = a.classify_with_cancel(&j, &c, "x", token).await;
        assert_fail_closed(&r, "cancelled");
    }

    #[tokio::test]
    async fn already_cancelled_token_never_passes() {
        let mock = Arc::new(MockClassifier::passing());
        let (j, c) = ids();
        let token = CancellationToken::new();
        token.cancel();
        let r = adapter(mock).classify_with_cancel(&j, &c, "x", token).await;
        assert_fail_closed(&r, "cancelled");
    }

    #[tokio::test]
    async fn provider_panic_fails_closed() {
        let mock = Arc::new(MockClassifier::new(MockResponse::Panic));
        let (j, c) = ids();
        let r = adapter(mock).classify(&j, &c, "x").await;
        assert_fail_closed(&r, "task failed");
    }

    #[tokio::test]
    async fn unconfigured_fails_closed() {
        let a = ClassifierAdapter::unconfigured();
        assert!(!a.is_configured());
        let (j, c) = ids();
        let r = a.classify(&j, &c, "x").await;
        assert_fail_closed(&r, "no semantic classifier configured");
    }

    #[tokio::test]
    async fn from_config_none_is_unconfigured() {
        let a = ClassifierAdapter::from_config(None).unwrap();
        assert!(!a.is_configured());
    }
}
