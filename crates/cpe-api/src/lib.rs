//! # cpe-api: HTTP Service for the Content Policy Engine
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |---|---|---|
//! | `/v1/compliance/*` | [`routes::compliance`] | Content checks and gates |
//! | `/v1/packs*` | [`routes::packs`] | Rule pack listing and reload |
//! | `/openapi.json` | [`openapi`] | Generated OpenAPI document |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the application router.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware so
/// they stay reachable without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::compliance::router())
        .merge(routes::packs::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. Packs are loaded before the router exists, so a
/// running router is ready.
async fn readiness() -> &'static str {
    "ready"
}
