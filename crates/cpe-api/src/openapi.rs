//! # OpenAPI Specification Assembly
//!
//! Served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Content Policy Engine API",
        description = "Jurisdiction-aware compliance checks for regulated-product content, plus age, jurisdiction and checkout gates.",
        license(name = "BUSL-1.1")
    ),
    paths(
        crate::routes::compliance::check_content,
        crate::routes::compliance::check_message,
        crate::routes::compliance::check_age,
        crate::routes::compliance::check_jurisdiction,
        crate::routes::compliance::check_checkout,
        crate::routes::packs::list_packs,
        crate::routes::packs::reload_packs,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::compliance::ContentCheckRequest,
        crate::routes::compliance::ComplianceResultResponse,
        crate::routes::compliance::MessageCheckBody,
        crate::routes::compliance::MessageCheckResponse,
        crate::routes::compliance::AgeCheckRequest,
        crate::routes::compliance::AgeCheckResponse,
        crate::routes::compliance::JurisdictionCheckResponse,
        crate::routes::compliance::CheckoutResponse,
        crate::routes::packs::PackSummaryResponse,
        crate::routes::packs::PackListResponse,
    )),
    tags(
        (name = "compliance", description = "Content checks and gates"),
        (name = "packs", description = "Rule pack administration"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
