//! # Result Validator
//!
//! Schema check for compliance results that originate outside this
//! workspace's constructors: classifier output and recorded regression
//! results.
//!
//! A valid result is a JSON object with
//!
//! - `status`: one of `"pass"`, `"fail"`, `"warning"`;
//! - `violations`: an array of strings;
//! - `suggestions`: an array of strings;
//!
//! and, when `status` is `"pass"`, an empty `violations` array. Extra keys
//! are ignored.

use serde_json::Value;

use crate::error::ResultValidationError;
use crate::result::{ComplianceResult, ComplianceStatus};

/// Validate `candidate` and convert it into a [`ComplianceResult`].
///
/// Pure function. The first failing check is reported.
pub fn validate_result(candidate: &Value) -> Result<ComplianceResult, ResultValidationError> {
    let obj = candidate
        .as_object()
        .ok_or_else(|| ResultValidationError::NotAnObject(json_kind(candidate)))?;

    let status_value = obj
        .get("status")
        .ok_or(ResultValidationError::MissingField("status"))?;
    let status = status_value
        .as_str()
        .and_then(ComplianceStatus::parse)
        .ok_or_else(|| ResultValidationError::InvalidStatus(status_value.to_string()))?;

    let violations = string_array(obj.get("violations"), "violations")?;
    let suggestions = string_array(obj.get("suggestions"), "suggestions")?;

    if status == ComplianceStatus::Pass && !violations.is_empty() {
        return Err(ResultValidationError::PassWithViolations(violations.len()));
    }

    Ok(ComplianceResult {
        status,
        violations,
        suggestions,
    })
}

fn string_array(
    value: Option<&Value>,
    field: &'static str,
) -> Result<Vec<String>, ResultValidationError> {
    let items = value
        .ok_or(ResultValidationError::MissingField(field))?
        .as_array()
        .ok_or(ResultValidationError::NotASequence(field))?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or(ResultValidationError::NonStringEntry { field, index })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
