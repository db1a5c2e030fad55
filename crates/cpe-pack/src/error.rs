//! Pack-specific error types.
//!
//! Every error names the file, or the jurisdiction/channel pair, it came
//! from, so a bad pack can be fixed without bisecting the pack directory.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or compiling rule packs.
#[derive(Debug, Error)]
pub enum PackError {
    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A required file or directory was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A rule pattern failed to compile.
    #[error("invalid pattern {pattern:?} in pack {jurisdiction}/{channel}: {source}")]
    InvalidPattern {
        jurisdiction: String,
        channel: String,
        pattern: String,
        source: regex::Error,
    },

    /// Two passing packs claim the same jurisdiction/channel pair.
    #[error("duplicate passing pack for {jurisdiction}/{channel} (versions {first} and {second})")]
    DuplicatePack {
        jurisdiction: String,
        channel: String,
        first: u32,
        second: u32,
    },

    /// A pack is structurally valid YAML but semantically wrong.
    #[error("invalid pack {jurisdiction}/{channel}: {detail}")]
    InvalidPack {
        jurisdiction: String,
        channel: String,
        detail: String,
    },

    /// Identifier validation failed (delegated from cpe-core).
    #[error("validation error: {0}")]
    Validation(#[from] cpe_core::ValidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A pack could not be serialized for digesting.
    #[error("failed to serialize pack {jurisdiction}/{channel} for digest: {source}")]
    Digest {
        jurisdiction: String,
        channel: String,
        source: serde_json::Error,
    },

    /// Generic serde_yaml error (not file-specific).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for pack operations.
pub type PackResult<T> = Result<T, PackError>;
