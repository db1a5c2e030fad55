//! # Compliance Check API
//!
//! ## Endpoints
//!
//! - `POST /v1/compliance/content`: two-stage content check
//! - `POST /v1/compliance/message`: content check reduced to `ok`/`reason`
//! - `POST /v1/compliance/age`: minimum-age gate
//! - `GET /v1/compliance/jurisdictions/:jurisdiction`: prohibition gate
//! - `POST /v1/compliance/checkout`: checkout gate
//!
//! A content check always answers 200. Classifier outages, timeouts and
//! malformed classifier output arrive as `status: "fail"` results.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use cpe_core::ComplianceResult;
use cpe_engine::{AgeGateResult, CheckoutResult, MessageCheckRequest, MessageCheckResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, validate_content, Validate};
use crate::state::AppState;

// ── DTOs ────────────────────────────────────────────────────────────────────

/// Content to check.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ContentCheckRequest {
    /// Jurisdiction code, e.g. "NY". Case-insensitive.
    pub jurisdiction: String,
    /// Distribution channel. Omitted or empty means retail.
    #[serde(default)]
    pub channel: String,
    pub content: String,
}

impl Validate for ContentCheckRequest {
    fn validate(&self) -> Result<(), String> {
        validate_content(&self.content)
    }
}

/// Outcome of a content check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplianceResultResponse {
    /// One of "pass", "fail", "warning".
    pub status: String,
    pub violations: Vec<String>,
    pub suggestions: Vec<String>,
}

impl From<ComplianceResult> for ComplianceResultResponse {
    fn from(r: ComplianceResult) -> Self {
        Self {
            status: r.status.as_str().to_string(),
            violations: r.violations,
            suggestions: r.suggestions,
        }
    }
}

/// Outbound message to check.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageCheckBody {
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub channel: String,
    pub jurisdiction: String,
    pub content: String,
}

impl Validate for MessageCheckBody {
    fn validate(&self) -> Result<(), String> {
        validate_content(&self.content)
    }
}

impl From<MessageCheckBody> for MessageCheckRequest {
    fn from(b: MessageCheckBody) -> Self {
        Self {
            org_id: b.org_id,
            channel: b.channel,
            jurisdiction: b.jurisdiction,
            content: b.content,
        }
    }
}

/// Outcome of a message check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageCheckResponse {
    /// `false` only when the message must not be sent.
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<MessageCheckResult> for MessageCheckResponse {
    fn from(r: MessageCheckResult) -> Self {
        Self {
            ok: r.ok,
            reason: r.reason,
        }
    }
}

/// Age gate input.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgeCheckRequest {
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub birth_date: String,
    pub jurisdiction: String,
}

impl Validate for AgeCheckRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Age gate outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgeCheckResponse {
    pub allowed: bool,
    pub min_age: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<AgeGateResult> for AgeCheckResponse {
    fn from(r: AgeGateResult) -> Self {
        Self {
            allowed: r.allowed,
            min_age: r.min_age,
            reason: r.reason,
        }
    }
}

/// Jurisdiction gate outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JurisdictionCheckResponse {
    /// The jurisdiction as submitted.
    pub jurisdiction: String,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Checkout gate outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    pub allowed: bool,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl From<CheckoutResult> for CheckoutResponse {
    fn from(r: CheckoutResult) -> Self {
        Self {
            allowed: r.allowed,
            violations: r.violations,
            warnings: r.warnings,
            errors: r.errors,
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────────────

/// Build the compliance router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/compliance/content", post(check_content))
        .route("/v1/compliance/message", post(check_message))
        .route("/v1/compliance/age", post(check_age))
        .route(
            "/v1/compliance/jurisdictions/:jurisdiction",
            get(check_jurisdiction),
        )
        .route("/v1/compliance/checkout", post(check_checkout))
}

// ── Handlers ────────────────────────────────────────────────────────────────

/// POST /v1/compliance/content: Run the fast path, then the classifier.
#[utoipa::path(
    post,
    path = "/v1/compliance/content",
    request_body = ContentCheckRequest,
    responses(
        (status = 200, description = "Check completed; failures are reported in the body", body = ComplianceResultResponse),
        (status = 400, description = "Malformed JSON", body = crate::error::ErrorBody),
        (status = 422, description = "Content too large", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
async fn check_content(
    State(state): State<AppState>,
    body: Result<Json<ContentCheckRequest>, JsonRejection>,
) -> Result<Json<ComplianceResultResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let result = state
        .engine
        .check_content(&req.jurisdiction, &req.channel, &req.content)
        .await;
    Ok(Json(result.into()))
}

/// POST /v1/compliance/message: Yes/no view for messaging.
#[utoipa::path(
    post,
    path = "/v1/compliance/message",
    request_body = MessageCheckBody,
    responses(
        (status = 200, description = "Check completed", body = MessageCheckResponse),
        (status = 400, description = "Malformed JSON", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
async fn check_message(
    State(state): State<AppState>,
    body: Result<Json<MessageCheckBody>, JsonRejection>,
) -> Result<Json<MessageCheckResponse>, AppError> {
    let req: MessageCheckRequest = extract_validated_json(body)?.into();
    let result = state.engine.check_message(&req).await;
    Ok(Json(result.into()))
}

/// POST /v1/compliance/age: Minimum-age gate.
#[utoipa::path(
    post,
    path = "/v1/compliance/age",
    request_body = AgeCheckRequest,
    responses(
        (status = 200, description = "Gate evaluated", body = AgeCheckResponse),
        (status = 422, description = "Unparseable or future birth date, or empty jurisdiction", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
async fn check_age(
    State(state): State<AppState>,
    body: Result<Json<AgeCheckRequest>, JsonRejection>,
) -> Result<Json<AgeCheckResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let result = state.engine.check_age(&req.birth_date, &req.jurisdiction)?;
    Ok(Json(result.into()))
}

/// GET /v1/compliance/jurisdictions/:jurisdiction: Prohibition gate.
#[utoipa::path(
    get,
    path = "/v1/compliance/jurisdictions/{jurisdiction}",
    params(("jurisdiction" = String, Path, description = "Jurisdiction code")),
    responses(
        (status = 200, description = "Gate evaluated", body = JurisdictionCheckResponse),
    ),
    tag = "compliance"
)]
async fn check_jurisdiction(
    State(state): State<AppState>,
    Path(jurisdiction): Path<String>,
) -> Json<JurisdictionCheckResponse> {
    let result = state.engine.check_jurisdiction_allowed(&jurisdiction);
    Json(JurisdictionCheckResponse {
        jurisdiction,
        allowed: result.allowed,
        reason: result.reason,
    })
}

/// POST /v1/compliance/checkout: Checkout gate. The cart is opaque JSON.
#[utoipa::path(
    post,
    path = "/v1/compliance/checkout",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Gate evaluated", body = CheckoutResponse),
        (status = 400, description = "Malformed JSON", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
async fn check_checkout(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let cart = extract_json(body)?;
    Ok(Json(state.engine.check_checkout(&cart).into()))
}
