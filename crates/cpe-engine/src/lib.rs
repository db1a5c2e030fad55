//! # cpe-engine: Compliance Orchestrator
//!
//! Caller-facing operations of the content policy engine:
//!
//! | Operation | Returns | Fails? |
//! |---|---|---|
//! | [`ComplianceEngine::check_content`] | `ComplianceResult` | never; failures are `fail` results |
//! | [`ComplianceEngine::check_message`] | [`MessageCheckResult`] | never |
//! | [`ComplianceEngine::check_age`] | [`AgeGateResult`] | on a malformed birth date or empty jurisdiction |
//! | [`ComplianceEngine::check_jurisdiction_allowed`] | [`JurisdictionGateResult`] | never |
//! | [`ComplianceEngine::check_checkout`] | [`CheckoutResult`] | never |
//!
//! Unmapped jurisdictions fall through to the semantic stage (fail-open on
//! missing rules). Classifier failures fail closed. Both directions are
//! covered by tests.

pub mod config;
pub mod engine;
pub mod fast_path;
pub mod gates;
pub mod message;

pub use config::{EngineConfig, EngineError};
pub use engine::ComplianceEngine;
pub use gates::{AgeGateResult, CheckoutResult, Denylist, JurisdictionGateResult, MIN_AGE};
pub use message::{MessageCheckRequest, MessageCheckResult};
