//! # Compliance Orchestrator
//!
//! [`ComplianceEngine`] composes the rule pack registry, the fast-path
//! matcher, and the classifier adapter into the two-stage content check,
//! and exposes the gates.
//!
//! ## Content check
//!
//! 1. Resolve the pack for `(jurisdiction, channel)` from the current
//!    registry snapshot.
//! 2. Run the fast path. Any match returns `fail` with the matched rule
//!    descriptions; the classifier is not called.
//! 3. Otherwise return the classifier adapter's validated result.
//!
//! A jurisdiction with no pack proceeds to step 3 with nothing matched.
//! Classifier failure of any kind yields `fail`.

use std::sync::Arc;

use chrono::NaiveDate;
use cpe_classifier::ClassifierAdapter;
use cpe_core::{today_utc, Channel, ComplianceResult, JurisdictionId, ValidationError};
use cpe_pack::{PackRegistry, RulePackStore};
use tokio_util::sync::CancellationToken;

use crate::config::{EngineConfig, EngineError};
use crate::fast_path;
use crate::gates::{self, AgeGateResult, CheckoutResult, Denylist, JurisdictionGateResult};
use crate::message::{MessageCheckRequest, MessageCheckResult};

/// The compliance engine. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct ComplianceEngine {
    registry: Arc<PackRegistry>,
    classifier: ClassifierAdapter,
    denylist: Denylist,
}

impl ComplianceEngine {
    /// Assemble an engine from parts.
    pub fn new(registry: Arc<PackRegistry>, classifier: ClassifierAdapter, denylist: Denylist) -> Self {
        Self {
            registry,
            classifier,
            denylist,
        }
    }

    /// Build an engine from configuration: load packs, construct the
    /// classifier.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let store = match &config.packs_dir {
            Some(dir) => RulePackStore::from_dir(dir)?,
            None => RulePackStore::builtin()?,
        };
        let classifier = ClassifierAdapter::from_config(config.classifier.as_ref())?;
        Ok(Self::new(
            Arc::new(PackRegistry::new(store)),
            classifier,
            config.denylist.clone(),
        ))
    }

    /// The pack registry, for listing and reload.
    pub fn registry(&self) -> &Arc<PackRegistry> {
        &self.registry
    }

    /// The classifier adapter.
    pub fn classifier(&self) -> &ClassifierAdapter {
        &self.classifier
    }

    /// The jurisdiction denylist.
    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    /// Two-stage content check. Never fails; see the module docs.
    pub async fn check_content(&self, jurisdiction: &str, channel: &str, content: &str) -> ComplianceResult {
        self.check_content_with_cancel(jurisdiction, channel, content, CancellationToken::new())
            .await
    }

    /// [`ComplianceEngine::check_content`] with cancellation of the semantic
    /// stage. Cancellation yields the fail-safe result.
    pub async fn check_content_with_cancel(
        &self,
        jurisdiction: &str,
        channel: &str,
        content: &str,
        cancel: CancellationToken,
    ) -> ComplianceResult {
        let jurisdiction = match JurisdictionId::new(jurisdiction) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(error = %e, "content check rejected, failing closed");
                return ComplianceResult::system_error(e);
            }
        };
        let channel = Channel::new(channel);

        let pack = self.registry.snapshot().resolve(&jurisdiction, &channel);
        let violations = fast_path::match_content(&pack, content);
        if !violations.is_empty() {
            tracing::info!(
                %jurisdiction,
                %channel,
                pack_version = pack.version(),
                violations = violations.len(),
                "fast-path violation"
            );
            return ComplianceResult::fail(violations);
        }

        tracing::debug!(
            %jurisdiction,
            %channel,
            pack_version = pack.version(),
            rules = pack.rules().len(),
            content_len = content.len(),
            "fast path clean, deferring to semantic stage"
        );
        self.classifier
            .classify_with_cancel(&jurisdiction, &channel, content, cancel)
            .await
    }

    /// Content check reduced to `ok` and a joined reason.
    pub async fn check_message(&self, request: &MessageCheckRequest) -> MessageCheckResult {
        let result = self
            .check_content(&request.jurisdiction, &request.channel, &request.content)
            .await;
        let out = MessageCheckResult::from(&result);
        tracing::debug!(org_id = %request.org_id, ok = out.ok, "message check complete");
        out
    }

    /// Minimum-age gate against today's UTC date.
    ///
    /// `jurisdiction` must be non-empty; the age threshold is the same
    /// everywhere.
    pub fn check_age(&self, birth_date: &str, jurisdiction: &str) -> Result<AgeGateResult, ValidationError> {
        self.check_age_on(birth_date, jurisdiction, today_utc())
    }

    /// [`ComplianceEngine::check_age`] against an explicit reference date.
    pub fn check_age_on(
        &self,
        birth_date: &str,
        jurisdiction: &str,
        today: NaiveDate,
    ) -> Result<AgeGateResult, ValidationError> {
        let jurisdiction = JurisdictionId::new(jurisdiction)?;
        let result = gates::check_age_on(birth_date, today)?;
        tracing::debug!(%jurisdiction, allowed = result.allowed, "age gate evaluated");
        Ok(result)
    }

    /// Jurisdiction prohibition gate. Independent of rule packs.
    ///
    /// An empty jurisdiction is not a place business may be conducted and is
    /// denied.
    pub fn check_jurisdiction_allowed(&self, jurisdiction: &str) -> JurisdictionGateResult {
        match JurisdictionId::new(jurisdiction) {
            Ok(j) => gates::check_jurisdiction(&self.denylist, &j),
            Err(e) => JurisdictionGateResult {
                allowed: false,
                reason: Some(e.to_string()),
            },
        }
    }

    /// Checkout gate. Allows every cart.
    pub fn check_checkout(&self, cart: &serde_json::Value) -> CheckoutResult {
        gates::check_checkout(cart)
    }
}
