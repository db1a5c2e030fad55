//! # Rule Pack Store
//!
//! An immutable table of compiled packs keyed by `(jurisdiction, channel)`,
//! plus [`PackRegistry`], the shared handle that swaps whole stores on
//! reload.
//!
//! ## Resolution
//!
//! 1. exact `(jurisdiction, channel)` passing pack;
//! 2. the jurisdiction's `retail` passing pack;
//! 3. an empty pack for the jurisdiction (no rules, version 0).
//!
//! Resolution never fails. Draft and deprecated packs are held for listing
//! and validation but never resolved.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use cpe_core::{Channel, JurisdictionId};
use parking_lot::RwLock;
use serde::Serialize;

use crate::error::{PackError, PackResult};
use crate::pack::{CompiledPack, PackStatus, RulePack};
use crate::parser;

const BUILTIN_PACKS: &str = include_str!("../packs/builtin.yaml");

type PackKey = (JurisdictionId, Channel);

/// Listing entry for a loaded pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackSummary {
    /// Jurisdiction code.
    pub jurisdiction: String,
    /// Channel label.
    pub channel: String,
    /// Pack version.
    pub version: u32,
    /// Lifecycle status.
    pub status: PackStatus,
    /// Number of rules.
    pub rule_count: usize,
    /// SHA-256 of the pack source.
    pub digest: String,
}

/// Immutable table of compiled rule packs.
#[derive(Debug, Default)]
pub struct RulePackStore {
    active: HashMap<PackKey, Arc<CompiledPack>>,
    all: Vec<Arc<CompiledPack>>,
}

impl RulePackStore {
    /// A store with no packs. Every resolution yields an empty pack.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile and index `packs`.
    ///
    /// # Errors
    ///
    /// - [`PackError::InvalidPattern`] / [`PackError::InvalidPack`] if any
    ///   rule fails to compile;
    /// - [`PackError::DuplicatePack`] if two passing packs share a pair.
    pub fn from_packs(packs: Vec<RulePack>) -> PackResult<Self> {
        let mut active: HashMap<PackKey, Arc<CompiledPack>> = HashMap::new();
        let mut all = Vec::with_capacity(packs.len());

        for pack in packs {
            let compiled = Arc::new(pack.compile()?);
            if compiled.status() == PackStatus::Passing {
                let key = (compiled.jurisdiction().clone(), compiled.channel().clone());
                if let Some(existing) = active.get(&key) {
                    return Err(PackError::DuplicatePack {
                        jurisdiction: key.0.to_string(),
                        channel: key.1.to_string(),
                        first: existing.version(),
                        second: compiled.version(),
                    });
                }
                active.insert(key, Arc::clone(&compiled));
            }
            all.push(compiled);
        }

        tracing::info!(
            loaded = all.len(),
            active = active.len(),
            "rule pack store built"
        );
        Ok(Self { active, all })
    }

    /// The packs compiled into this binary.
    pub fn builtin() -> PackResult<Self> {
        Self::from_packs(parser::parse_packs_str(BUILTIN_PACKS)?)
    }

    /// Load every pack file in `dir`.
    pub fn from_dir(dir: &Path) -> PackResult<Self> {
        Self::from_packs(parser::load_pack_dir(dir)?)
    }

    /// Resolve the pack governing `(jurisdiction, channel)`.
    pub fn resolve(&self, jurisdiction: &JurisdictionId, channel: &Channel) -> Arc<CompiledPack> {
        let exact = (jurisdiction.clone(), channel.clone());
        if let Some(pack) = self.active.get(&exact) {
            return Arc::clone(pack);
        }
        if !channel.is_retail() {
            let retail = (jurisdiction.clone(), Channel::retail());
            if let Some(pack) = self.active.get(&retail) {
                return Arc::clone(pack);
            }
        }
        Arc::new(CompiledPack::empty(jurisdiction.clone(), channel.clone()))
    }

    /// Number of packs loaded, including non-passing ones.
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Number of passing packs, the ones resolution can return.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Whether no packs are loaded.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Summaries of every loaded pack, sorted by jurisdiction, channel, version.
    pub fn summaries(&self) -> Vec<PackSummary> {
        let mut out: Vec<PackSummary> = self
            .all
            .iter()
            .map(|p| PackSummary {
                jurisdiction: p.jurisdiction().to_string(),
                channel: p.channel().to_string(),
                version: p.version(),
                status: p.status(),
                rule_count: p.rules().len(),
                digest: p.digest().to_string(),
            })
            .collect();
        out.sort_by(|a, b| {
            (&a.jurisdiction, &a.channel, a.version).cmp(&(&b.jurisdiction, &b.channel, b.version))
        });
        out
    }
}

/// Shared, reloadable handle to the current [`RulePackStore`].
///
/// Readers take a snapshot (an `Arc` clone) and run their whole check
/// against it; [`PackRegistry::replace`] swaps the store without disturbing
/// in-flight snapshots. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct PackRegistry {
    current: RwLock<Arc<RulePackStore>>,
}

impl PackRegistry {
    /// Wrap an initial store.
    pub fn new(store: RulePackStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// The store as of now.
    pub fn snapshot(&self) -> Arc<RulePackStore> {
        self.current.read().clone()
    }

    /// Replace the store wholesale.
    pub fn replace(&self, store: RulePackStore) {
        let store = Arc::new(store);
        tracing::info!(
            packs = store.len(),
            active = store.active_len(),
            "rule pack registry replaced"
        );
        *self.current.write() = store;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn jid(s: &str) -> JurisdictionId {
        JurisdictionId::new(s).unwrap()
    }

    fn pack(j: &str, ch: &str, version: u32, status: PackStatus, desc: &str) -> RulePack {
        RulePack {
            jurisdiction: jid(j),
            channel: Channel::new(ch),
            version,
            status,
            rules: vec![Rule::Regex {
                pattern: "x".into(),
                description: desc.into(),
            }],
        }
    }

    fn first_description(p: &CompiledPack) -> Option<&str> {
        p.rules().first().map(|r| r.description())
    }

    #[test]
    fn resolves_exact_then_retail_then_empty() {
        let store = RulePackStore::from_packs(vec![
            pack("NY", "retail", 1, PackStatus::Passing, "ny-retail"),
            pack("NY", "advertising", 1, PackStatus::Passing, "ny-ads"),
        ])
        .unwrap();

        let exact = store.resolve(&jid("NY"), &Channel::new("advertising"));
        assert_eq!(first_description(&exact), Some("ny-ads"));

        let fallback = store.resolve(&jid("NY"), &Channel::new("sms"));
        assert_eq!(first_description(&fallback), Some("ny-retail"));

        let empty = store.resolve(&jid("ZZ"), &Channel::new("sms"));
        assert!(empty.rules().is_empty());
        assert_eq!(empty.jurisdiction().as_str(), "ZZ");
    }

    #[test]
    fn non_passing_packs_are_excluded_from_resolution() {
        let store = RulePackStore::from_packs(vec![
            pack("CA", "retail", 2, PackStatus::Draft, "draft"),
            pack("CA", "retail", 1, PackStatus::Deprecated, "old"),
        ])
        .unwrap();
        assert!(store.resolve(&jid("CA"), &Channel::retail()).rules().is_empty());
        assert_eq!(store.len(), 2);
        assert_eq!(store.active_len(), 0);
    }

    #[test]
    fn passing_pack_coexists_with_draft_of_same_pair() {
        let store = RulePackStore::from_packs(vec![
            pack("CA", "retail", 1, PackStatus::Passing, "live"),
            pack("CA", "retail", 2, PackStatus::Draft, "next"),
        ])
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.active_len(), 1);
        let p = store.resolve(&jid("ca"), &Channel::new(""));
        assert_eq!(first_description(&p), Some("live"));
    }

    #[test]
    fn duplicate_passing_packs_rejected() {
        let err = RulePackStore::from_packs(vec![
            pack("CA", "retail", 1, PackStatus::Passing, "a"),
            pack("ca", "RETAIL", 2, PackStatus::Passing, "b"),
        ])
        .unwrap_err();
        assert!(matches!(err, PackError::DuplicatePack { first: 1, second: 2, .. }));
    }

    #[test]
    fn builtin_packs_load() {
        let store = RulePackStore::builtin().unwrap();
        assert!(!store.is_empty());
        let ny = store.resolve(&jid("NY"), &Channel::retail());
        assert!(ny.version() > 0);
        assert!(ny.rules().iter().any(|r| r.matches("GUARANTEED RELIEF")));
        assert!(ny.rules().iter().any(|r| r.matches("it will heal you")));
        for summary in store.summaries() {
            assert!(summary.rule_count > 0);
            assert_eq!(summary.digest.len(), 64);
        }
    }

    #[test]
    fn summaries_are_sorted() {
        let store = RulePackStore::from_packs(vec![
            pack("NY", "sms", 1, PackStatus::Passing, "a"),
            pack("CA", "retail", 1, PackStatus::Passing, "b"),
            pack("NY", "retail", 1, PackStatus::Passing, "c"),
        ])
        .unwrap();
        let keys: Vec<(String, String)> = store
            .summaries()
            .into_iter()
            .map(|s| (s.jurisdiction, s.channel))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("CA".into(), "retail".into()),
                ("NY".into(), "retail".into()),
                ("NY".into(), "sms".into()),
            ]
        );
    }

    #[test]
    fn registry_replace_leaves_old_snapshot_intact() {
        let registry = PackRegistry::new(
            RulePackStore::from_packs(vec![pack("NY", "retail", 1, PackStatus::Passing, "v1")])
                .unwrap(),
        );
        let before = registry.snapshot();

        registry.replace(
            RulePackStore::from_packs(vec![pack("NY", "retail", 2, PackStatus::Passing, "v2")])
                .unwrap(),
        );
        let after = registry.snapshot();

        let old = before.resolve(&jid("NY"), &Channel::retail());
        let new = after.resolve(&jid("NY"), &Channel::retail());
        assert_eq!(old.version(), 1);
        assert_eq!(new.version(), 2);
    }
}
