//! Message check: a yes/no view of a content check for messaging callers.

use cpe_core::ComplianceResult;
use serde::{Deserialize, Serialize};

/// A message to check before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCheckRequest {
    /// Sending organization. Carried for the caller's audit trail.
    #[serde(default)]
    pub org_id: String,
    /// Channel the message goes out on.
    #[serde(default)]
    pub channel: String,
    /// Jurisdiction of the recipient.
    pub jurisdiction: String,
    /// Message text.
    pub content: String,
}

/// Outcome of a message check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCheckResult {
    /// `false` only when the underlying status is `fail`.
    pub ok: bool,
    /// All violations joined with `", "`, when there are any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&ComplianceResult> for MessageCheckResult {
    fn from(result: &ComplianceResult) -> Self {
        Self {
            // Warnings do not block sending.
            ok: !result.is_blocking(),
            reason: (!result.violations.is_empty()).then(|| result.violations.join(", ")),
        }
    }
}
