//! # cpe-classifier: Semantic Classifier Adapter
//!
//! The only part of the engine that performs network I/O. A provider behind
//! the [`SemanticClassifier`] trait turns `(jurisdiction, channel, content)`
//! into either a structured object or free text; [`ClassifierAdapter`] turns
//! that into a validated [`ComplianceResult`](cpe_core::ComplianceResult),
//! failing closed on every error path.
//!
//! ## Providers
//!
//! - [`HttpClassifier`]: OpenAI-compatible chat-completions endpoint, with
//!   connection retry bounded by the classification deadline (`retry.rs`).
//! - [`MockClassifier`]: scripted responses, delays, and a call counter.
//!
//! ## Crate Policy
//!
//! - Depends only on `cpe-core` internally.
//! - Content text is never logged; only its length.

pub mod adapter;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod prompt;
pub(crate) mod retry;

pub use adapter::ClassifierAdapter;
pub use config::{ClassifierConfig, ConfigError};
pub use error::ClassifierError;
pub use http::HttpClassifier;
pub use mock::{MockClassifier, MockResponse};

use async_trait::async_trait;
use cpe_core::{Channel, JurisdictionId};
use serde::Serialize;

/// Input to a classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRequest {
    /// Jurisdiction whose rules apply.
    pub jurisdiction: JurisdictionId,
    /// Channel carrying the content.
    pub channel: Channel,
    /// Text under review.
    pub content: String,
}

/// Raw classifier output, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierOutput {
    /// An object expected to match the compliance result shape.
    Structured(serde_json::Value),
    /// Free text expected to contain such an object.
    Text(String),
}

/// Provider boundary for semantic classification.
///
/// Implementations may fail in any way; the adapter owns the fail-closed
/// policy.
#[async_trait]
pub trait SemanticClassifier: Send + Sync {
    /// Classify one request.
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassifierOutput, ClassifierError>;

    /// Short provider label for logs.
    fn name(&self) -> &str;
}
