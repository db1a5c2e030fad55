//! # Rule Pack Administration
//!
//! - `GET /v1/packs`: list every loaded pack, including drafts
//! - `POST /v1/packs/reload`: re-read packs and swap the live store
//!
//! A reload that fails to parse or compile leaves the running store in
//! place and answers 422.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use cpe_pack::{PackSummary, RulePackStore};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Listing entry for a loaded pack.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackSummaryResponse {
    pub jurisdiction: String,
    pub channel: String,
    pub version: u32,
    /// "draft", "passing" or "deprecated". Only passing packs are enforced.
    pub status: String,
    pub rule_count: usize,
    /// SHA-256 of the pack source, hex.
    pub digest: String,
}

impl From<PackSummary> for PackSummaryResponse {
    fn from(s: PackSummary) -> Self {
        Self {
            jurisdiction: s.jurisdiction,
            channel: s.channel,
            version: s.version,
            status: s.status.as_str().to_string(),
            rule_count: s.rule_count,
            digest: s.digest,
        }
    }
}

/// Loaded packs.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PackListResponse {
    /// Number of enforced (passing) packs.
    pub active: usize,
    pub packs: Vec<PackSummaryResponse>,
}

fn list_response(store: &RulePackStore) -> PackListResponse {
    PackListResponse {
        active: store.active_len(),
        packs: store.summaries().into_iter().map(Into::into).collect(),
    }
}

/// Build the packs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/packs", get(list_packs))
        .route("/v1/packs/reload", post(reload_packs))
}

/// GET /v1/packs: List loaded packs.
#[utoipa::path(
    get,
    path = "/v1/packs",
    responses(
        (status = 200, description = "Loaded packs", body = PackListResponse),
    ),
    tag = "packs"
)]
async fn list_packs(State(state): State<AppState>) -> Json<PackListResponse> {
    Json(list_response(&state.engine.registry().snapshot()))
}

/// POST /v1/packs/reload: Re-read packs from the configured source.
#[utoipa::path(
    post,
    path = "/v1/packs/reload",
    responses(
        (status = 200, description = "Store replaced", body = PackListResponse),
        (status = 422, description = "Packs failed to load; store unchanged", body = crate::error::ErrorBody),
    ),
    tag = "packs"
)]
async fn reload_packs(State(state): State<AppState>) -> Result<Json<PackListResponse>, AppError> {
    let dir = state.config.packs_dir.clone();
    let store = tokio::task::spawn_blocking(move || match dir {
        Some(dir) => RulePackStore::from_dir(&dir),
        None => RulePackStore::builtin(),
    })
    .await
    .map_err(|e| AppError::Internal(format!("pack reload task failed: {e}")))?
    .map_err(|e| {
        tracing::warn!(error = %e, "pack reload rejected, keeping current store");
        AppError::from(e)
    })?;

    let response = list_response(&store);
    state.engine.registry().replace(store);
    Ok(Json(response))
}
