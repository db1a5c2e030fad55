//! Shared application state for the Axum router.

use std::path::PathBuf;
use std::sync::Arc;

use cpe_engine::ComplianceEngine;
use zeroize::Zeroizing;

/// Server configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token. `None` disables authentication.
    pub auth_token: Option<Zeroizing<String>>,
    /// Directory re-read by `POST /v1/packs/reload`. `None` reloads the
    /// built-in packs.
    pub packs_dir: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("packs_dir", &self.packs_dir)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            packs_dir: None,
        }
    }
}

impl AppConfig {
    /// Read `PORT` and `AUTH_TOKEN` through `get`. `packs_dir` is left for
    /// the caller to copy from the engine configuration.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let port = get("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080);
        let auth_token = get("AUTH_TOKEN")
            .filter(|t| !t.is_empty())
            .map(Zeroizing::new);
        Self {
            port,
            auth_token,
            packs_dir: None,
        }
    }
}

/// State handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<ComplianceEngine>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(engine: ComplianceEngine, config: AppConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config,
        }
    }
}
