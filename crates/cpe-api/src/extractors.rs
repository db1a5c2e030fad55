//! # Request Extraction & Validation
//!
//! The [`Validate`] trait for request DTOs and helpers that turn axum JSON
//! rejections into [`AppError`]s.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Upper bound on content submitted for a check, in bytes.
pub const MAX_CONTENT_BYTES: usize = 64 * 1024;

/// Request types with rules beyond what serde checks.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and run its [`Validate`] rules.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Shared content length rule.
pub(crate) fn validate_content(content: &str) -> Result<(), String> {
    if content.len() > MAX_CONTENT_BYTES {
        return Err(format!(
            "content is {} bytes, limit is {MAX_CONTENT_BYTES}",
            content.len()
        ));
    }
    Ok(())
}
