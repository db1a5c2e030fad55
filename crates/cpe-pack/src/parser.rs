//! YAML loading for pack files.
//!
//! A pack file holds a top-level `packs` sequence:
//!
//! ```yaml
//! packs:
//!   - jurisdiction: NY
//!     channel: retail
//!     version: 3
//!     status: passing
//!     rules:
//!       - type: regex
//!         pattern: "guaranteed relief"
//!         description: "Guaranteed outcome claims are prohibited"
//! ```
//!
//! A directory is loaded by reading every `*.yaml` / `*.yml` file in it, in
//! file-name order. Subdirectories are not traversed.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PackError, PackResult};
use crate::pack::RulePack;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackFile {
    #[serde(default)]
    packs: Vec<RulePack>,
}

/// Parse pack YAML from a string.
pub fn parse_packs_str(yaml: &str) -> PackResult<Vec<RulePack>> {
    let file: PackFile = serde_yaml::from_str(yaml)?;
    Ok(file.packs)
}

/// Load every pack declared in one YAML file.
pub fn load_pack_file(path: &Path) -> PackResult<Vec<RulePack>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PackError::Io(e)
        }
    })?;
    let file: PackFile = serde_yaml::from_str(&content).map_err(|e| PackError::YamlParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), packs = file.packs.len(), "loaded pack file");
    Ok(file.packs)
}

/// Load every pack file in `dir`.
pub fn load_pack_dir(dir: &Path) -> PackResult<Vec<RulePack>> {
    if !dir.is_dir() {
        return Err(PackError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();
    files.sort();

    let mut packs = Vec::new();
    for file in &files {
        packs.extend(load_pack_file(file)?);
    }
    Ok(packs)
}
