//! # Rule Packs
//!
//! A [`RulePack`] is the authored, serializable form: one jurisdiction, one
//! channel, a version, a lifecycle status, and an ordered rule list.
//! [`CompiledPack`] is what the store hands out at check time.

use cpe_core::{Channel, JurisdictionId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{PackError, PackResult};
use crate::rule::{CompiledRule, Rule};

/// Lifecycle tag of a pack. Only [`PackStatus::Passing`] packs are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackStatus {
    /// Authored but not yet approved.
    Draft,
    /// Approved for live enforcement.
    Passing,
    /// Superseded; kept for audit.
    Deprecated,
}

impl PackStatus {
    /// Return the string value for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Passing => "passing",
            Self::Deprecated => "deprecated",
        }
    }
}

impl std::fmt::Display for PackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A versioned, jurisdiction/channel-scoped collection of rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePack {
    /// Region whose rules these are.
    pub jurisdiction: JurisdictionId,
    /// Channel the rules govern. Omitted in a pack file means retail.
    #[serde(default)]
    pub channel: Channel,
    /// Bumped whenever `rules` changes.
    pub version: u32,
    /// Lifecycle tag.
    pub status: PackStatus,
    /// Ordered rules. Evaluation is exhaustive.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RulePack {
    /// Compile every rule, failing on the first invalid pattern.
    pub fn compile(self) -> PackResult<CompiledPack> {
        let mut compiled = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let pattern = rule.pattern_source().ok_or_else(|| PackError::InvalidPack {
                jurisdiction: self.jurisdiction.to_string(),
                channel: self.channel.to_string(),
                detail: format!("{} rule {:?} has no keywords", rule.kind(), rule.description()),
            })?;
            let c = rule
                .compile(&pattern)
                .map_err(|source| PackError::InvalidPattern {
                    jurisdiction: self.jurisdiction.to_string(),
                    channel: self.channel.to_string(),
                    pattern: pattern.clone(),
                    source,
                })?;
            compiled.push(c);
        }
        let digest = pack_digest(&self)?;
        Ok(CompiledPack {
            source: self,
            rules: compiled,
            digest,
        })
    }
}

/// A pack whose rules are compiled and whose digest is computed.
#[derive(Debug, Clone)]
pub struct CompiledPack {
    source: RulePack,
    rules: Vec<CompiledRule>,
    digest: String,
}

impl CompiledPack {
    /// The pack returned when a jurisdiction has no configured rules:
    /// version 0, passing, no rules.
    pub fn empty(jurisdiction: JurisdictionId, channel: Channel) -> Self {
        let source = RulePack {
            jurisdiction,
            channel,
            version: 0,
            status: PackStatus::Passing,
            rules: Vec::new(),
        };
        let digest = pack_digest(&source).unwrap_or_else(|e| {
            tracing::error!(error = %e, "empty pack digest unavailable");
            String::new()
        });
        Self {
            source,
            rules: Vec::new(),
            digest,
        }
    }

    /// Jurisdiction of the pack.
    pub fn jurisdiction(&self) -> &JurisdictionId {
        &self.source.jurisdiction
    }

    /// Channel of the pack.
    pub fn channel(&self) -> &Channel {
        &self.source.channel
    }

    /// Pack version.
    pub fn version(&self) -> u32 {
        self.source.version
    }

    /// Lifecycle status.
    pub fn status(&self) -> PackStatus {
        self.source.status
    }

    /// Compiled rules in authored order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Lowercase hex SHA-256 of the pack's JSON form (object keys sorted).
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

fn pack_digest(pack: &RulePack) -> PackResult<String> {
    // Round-tripping through Value sorts object keys.
    let bytes = serde_json::to_value(pack)
        .and_then(|v| serde_json::to_vec(&v))
        .map_err(|source| PackError::Digest {
            jurisdiction: pack.jurisdiction.to_string(),
            channel: pack.channel.to_string(),
            source,
        })?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
