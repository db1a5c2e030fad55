//! Engine configuration and construction errors.

use std::path::PathBuf;

use cpe_classifier::{ClassifierConfig, ClassifierError, ConfigError};
use cpe_pack::PackError;

use crate::gates::Denylist;

/// Everything needed to build a [`ComplianceEngine`](crate::ComplianceEngine).
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Directory of pack YAML files. `None` selects the built-in packs.
    pub packs_dir: Option<PathBuf>,
    /// Prohibited jurisdictions.
    pub denylist: Denylist,
    /// Semantic classifier endpoint. `None` means every semantic check
    /// fails closed.
    pub classifier: Option<ClassifierConfig>,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CPE_PACKS_DIR` (default: built-in packs)
    /// - `CPE_PROHIBITED_JURISDICTIONS` (default: `ID,NE,KS`)
    /// - the `CPE_CLASSIFIER_*` variables of [`ClassifierConfig::from_env`]
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`], reading variables through `get`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, EngineError> {
        let packs_dir = get("CPE_PACKS_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let denylist = get("CPE_PROHIBITED_JURISDICTIONS")
            .map(|list| Denylist::parse(&list))
            .unwrap_or_default();
        let classifier = ClassifierConfig::from_lookup(&get)?;
        Ok(Self {
            packs_dir,
            denylist,
            classifier,
        })
    }
}

/// Errors building an engine. Checks themselves never return these.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Rule packs failed to load.
    #[error("rule pack error: {0}")]
    Pack(#[from] PackError),
    /// Classifier could not be constructed.
    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),
    /// Classifier configuration is invalid.
    #[error("classifier configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpe_core::JurisdictionId;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert!(cfg.packs_dir.is_none());
        assert!(cfg.classifier.is_none());
        assert_eq!(cfg.denylist, Denylist::default());
    }

    #[test]
    fn overrides() {
        let cfg = EngineConfig::from_lookup(lookup(&[
            ("CPE_PACKS_DIR", "/etc/cpe/packs"),
            ("CPE_PROHIBITED_JURISDICTIONS", "tx,ut"),
            ("CPE_CLASSIFIER_URL", "http://127.0.0.1:8000/v1"),
            ("CPE_CLASSIFIER_API_KEY", "k"),
        ]))
        .unwrap();
        assert_eq!(cfg.packs_dir, Some(PathBuf::from("/etc/cpe/packs")));
        assert!(cfg.denylist.contains(&JurisdictionId::new("TX").unwrap()));
        assert!(!cfg.denylist.contains(&JurisdictionId::new("ID").unwrap()));
        assert!(cfg.classifier.is_some());
    }

    #[test]
    fn classifier_misconfiguration_surfaces() {
        let err = EngineConfig::from_lookup(lookup(&[(
            "CPE_CLASSIFIER_URL",
            "http://127.0.0.1:8000/v1",
        )]))
        .unwrap_err();
        assert!(matches!(err, EngineError::Config(ConfigError::MissingApiKey)));
    }
}
