//! # Compliance Result
//!
//! The single result type produced by both the fast path and the semantic
//! stage.

use serde::{Deserialize, Serialize};

/// Leading text of every violation produced when the engine could not verify
/// content. Regression tooling matches on it.
pub const SYSTEM_ERROR_PREFIX: &str = "Compliance check failed";

/// Suggestion attached to every fail-closed system-error result.
pub const MANUAL_REVIEW_SUGGESTION: &str =
    "Retry the compliance check or route the content for manual review";

/// Outcome of a compliance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    /// No violation found.
    Pass,
    /// At least one violation, or the content could not be verified.
    Fail,
    /// Allowed, with remarks the caller should surface.
    Warning,
}

impl ComplianceStatus {
    /// Return the string value for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warning => "warning",
        }
    }

    /// Parse a wire value. Exact lowercase match only.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one piece of content.
///
/// `violations` and `suggestions` are always present. A `pass` result has no
/// violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// Overall outcome.
    pub status: ComplianceStatus,
    /// Rule descriptions or classifier explanations, in detection order.
    pub violations: Vec<String>,
    /// Remediation hints, possibly empty.
    pub suggestions: Vec<String>,
}

impl ComplianceResult {
    /// A clean pass.
    pub fn pass() -> Self {
        Self {
            status: ComplianceStatus::Pass,
            violations: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// A definitive failure listing the violated rules.
    pub fn fail(violations: Vec<String>) -> Self {
        Self {
            status: ComplianceStatus::Fail,
            violations,
            suggestions: Vec::new(),
        }
    }

    /// The fail-closed result returned whenever content could not be
    /// verified (classifier error, timeout, malformed output, bad input).
    pub fn system_error(reason: impl std::fmt::Display) -> Self {
        Self {
            status: ComplianceStatus::Fail,
            violations: vec![format!("{SYSTEM_ERROR_PREFIX}: {reason}")],
            suggestions: vec![MANUAL_REVIEW_SUGGESTION.to_string()],
        }
    }

    /// Whether this result blocks the content.
    pub fn is_blocking(&self) -> bool {
        self.status == ComplianceStatus::Fail
    }

    /// Whether this result came from [`ComplianceResult::system_error`].
    pub fn is_system_error(&self) -> bool {
        self.status == ComplianceStatus::Fail
            && self
                .violations
                .first()
                .is_some_and(|v| v.starts_with(SYSTEM_ERROR_PREFIX))
    }
}
