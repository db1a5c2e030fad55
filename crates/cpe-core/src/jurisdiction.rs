//! # Jurisdiction & Channel Identifiers
//!
//! Newtypes for the two addressing primitives of every compliance check: the
//! legal region whose rules apply, and the communication channel carrying the
//! content.
//!
//! ## Normalization
//!
//! [`JurisdictionId`] is trimmed and upper-cased, and must be non-empty.
//! [`Channel`] is trimmed and lower-cased; an empty channel is the
//! [`Channel::RETAIL`] channel, which is also the fallback for channels a
//! jurisdiction does not stock explicitly.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A jurisdiction identifier, typically a US state code (e.g. `"NY"`).
///
/// # Validation
///
/// Must be non-empty after trimming. No further format restriction is
/// imposed: unknown codes are valid and simply resolve to an empty rule pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JurisdictionId(String);

impl JurisdictionId {
    /// Create a jurisdiction identifier, trimming and upper-casing the input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidJurisdictionId`] if the string is
    /// empty or whitespace-only.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let s = value.as_ref().trim();
        if s.is_empty() {
            return Err(ValidationError::InvalidJurisdictionId);
        }
        Ok(Self(s.to_uppercase()))
    }

    /// Access the normalized identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JurisdictionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for JurisdictionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JurisdictionId> for String {
    fn from(id: JurisdictionId) -> Self {
        id.0
    }
}

/// A communication channel category (e.g. `retail`, `advertising`, `sms`).
///
/// Channels are an open set: any label is accepted, and labels a jurisdiction
/// has no explicit pack for fall back to that jurisdiction's retail rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Channel(String);

impl Channel {
    /// Label of the fallback channel.
    pub const RETAIL: &'static str = "retail";

    /// Create a channel, trimming and lower-casing the input. Empty input
    /// yields the retail channel.
    pub fn new(value: impl AsRef<str>) -> Self {
        let s = value.as_ref().trim();
        if s.is_empty() {
            return Self::retail();
        }
        Self(s.to_lowercase())
    }

    /// The retail channel.
    pub fn retail() -> Self {
        Self(Self::RETAIL.to_string())
    }

    /// Whether this is the retail channel.
    pub fn is_retail(&self) -> bool {
        self.0 == Self::RETAIL
    }

    /// Access the normalized channel label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::retail()
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Channel {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.0
    }
}
