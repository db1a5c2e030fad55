//! # cpe-cli: Command-Line Tool for the Content Policy Engine
//!
//! ## Subcommands
//!
//! - `cpe check`: run one content or message check and print the result.
//! - `cpe gate`: evaluate the age or jurisdiction gate.
//! - `cpe packs`: validate pack files, list loaded packs.
//! - `cpe eval`: run a golden corpus against the engine and score it.
//!
//! ```bash
//! cpe check --jurisdiction NY "Guaranteed relief tonight"
//! cpe packs validate packs/
//! cpe eval golden/ny.yaml --threshold 0.95
//! ```
//!
//! Exit codes: 0 success, 1 check failed or score below threshold, 2
//! operational error.

pub mod check;
pub mod eval;
pub mod gate;
pub mod packs;

use std::path::Path;

use anyhow::{Context, Result};
use cpe_engine::{ComplianceEngine, EngineConfig};

/// Build an engine from the environment, with `packs` overriding
/// `CPE_PACKS_DIR`.
pub fn build_engine(packs: Option<&Path>) -> Result<ComplianceEngine> {
    let mut config = EngineConfig::from_env().context("invalid engine configuration")?;
    if let Some(dir) = packs {
        config.packs_dir = Some(dir.to_path_buf());
    }
    if config.classifier.is_none() {
        tracing::warn!("CPE_CLASSIFIER_URL not set: semantic checks will fail closed");
    }
    ComplianceEngine::from_config(&config).context("failed to build compliance engine")
}

/// Multi-threaded runtime for the async subcommands.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
