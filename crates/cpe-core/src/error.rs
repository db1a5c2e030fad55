//! # Error Hierarchy
//!
//! Structured error types for the core crate, built with `thiserror`.
//!
//! Two families live here:
//!
//! - [`ValidationError`]: a caller handed us a structurally invalid value
//!   (empty jurisdiction, unparsable birth date). These are surfaced to the
//!   caller.
//! - [`ResultValidationError`]: a candidate compliance result failed the
//!   schema check. These never reach an end caller; the classifier adapter
//!   converts them into a fail-closed result.

use thiserror::Error;

/// Validation errors for caller-supplied primitives.
///
/// Each variant carries the invalid input and the expected format so that
/// callers can diagnose the request without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Jurisdiction identifier is empty.
    #[error("invalid jurisdiction ID: must be non-empty")]
    InvalidJurisdictionId,

    /// Birth date string could not be parsed.
    #[error("invalid birth date: \"{value}\" ({reason})")]
    InvalidBirthDate {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Birth date lies after the reference date.
    #[error("birth date {birth_date} is after the reference date {today}")]
    BirthDateInFuture {
        /// The parsed birth date (YYYY-MM-DD).
        birth_date: String,
        /// The reference date (YYYY-MM-DD).
        today: String,
    },
}

/// Reasons a candidate [`ComplianceResult`](crate::ComplianceResult) is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultValidationError {
    /// The candidate is not a JSON object.
    #[error("compliance result must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A required field is absent.
    #[error("compliance result is missing required field \"{0}\"")]
    MissingField(&'static str),

    /// `status` is not one of `pass`, `fail`, `warning`.
    #[error("compliance result has invalid status {0} (expected pass, fail, or warning)")]
    InvalidStatus(String),

    /// `violations` or `suggestions` is not an array.
    #[error("compliance result field \"{0}\" must be an array")]
    NotASequence(&'static str),

    /// An array entry is not a string.
    #[error("compliance result field \"{field}\" has a non-string entry at index {index}")]
    NonStringEntry {
        /// The offending field.
        field: &'static str,
        /// Position of the offending entry.
        index: usize,
    },

    /// A `pass` result carried violations.
    #[error("compliance result has status pass but lists {0} violation(s)")]
    PassWithViolations(usize),
}
