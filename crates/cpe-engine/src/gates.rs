//! # Gates
//!
//! Narrow yes/no checks used alongside content checks: minimum age,
//! jurisdiction prohibition, and checkout. None of them consult rule packs
//! or the classifier.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use cpe_core::{age_on, parse_birth_date, JurisdictionId, ValidationError};
use serde::{Deserialize, Serialize};

/// Minimum age for every jurisdiction this engine serves.
pub const MIN_AGE: u32 = 21;

/// Jurisdictions prohibited when no override is configured.
pub const DEFAULT_PROHIBITED_JURISDICTIONS: &[&str] = &["ID", "NE", "KS"];

/// Outcome of an age check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGateResult {
    /// Whether the subject meets the minimum age.
    pub allowed: bool,
    /// Always [`MIN_AGE`].
    pub min_age: u32,
    /// Present only when denied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Outcome of a jurisdiction check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurisdictionGateResult {
    /// Whether business may be conducted in the jurisdiction.
    pub allowed: bool,
    /// Present only when denied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Outcome of a checkout check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResult {
    /// Whether the cart may proceed.
    pub allowed: bool,
    /// Blocking findings.
    pub violations: Vec<String>,
    /// Non-blocking findings.
    pub warnings: Vec<String>,
    /// Problems evaluating the cart.
    pub errors: Vec<String>,
}

/// Jurisdictions where the business activity is not permitted at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    prohibited: BTreeSet<JurisdictionId>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROHIBITED_JURISDICTIONS
                .iter()
                .filter_map(|code| JurisdictionId::new(code).ok()),
        )
    }
}

impl Denylist {
    /// A denylist of exactly `jurisdictions`.
    pub fn new(jurisdictions: impl IntoIterator<Item = JurisdictionId>) -> Self {
        Self {
            prohibited: jurisdictions.into_iter().collect(),
        }
    }

    /// Parse a comma-separated list such as `"ID, NE,KS"`. Blank entries are
    /// skipped.
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .filter_map(|code| JurisdictionId::new(code).ok()),
        )
    }

    /// Whether `jurisdiction` is prohibited.
    pub fn contains(&self, jurisdiction: &JurisdictionId) -> bool {
        self.prohibited.contains(jurisdiction)
    }

    /// Prohibited jurisdictions, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &JurisdictionId> {
        self.prohibited.iter()
    }
}

/// Age gate against an explicit reference date.
///
/// # Errors
///
/// - [`ValidationError::InvalidBirthDate`] if `birth_date` is neither
///   `YYYY-MM-DD` nor RFC 3339;
/// - [`ValidationError::BirthDateInFuture`] if it lies after `today`.
pub fn check_age_on(birth_date: &str, today: NaiveDate) -> Result<AgeGateResult, ValidationError> {
    let birth = parse_birth_date(birth_date)?;
    let age = age_on(birth, today)?;
    let allowed = age >= MIN_AGE;
    Ok(AgeGateResult {
        allowed,
        min_age: MIN_AGE,
        reason: (!allowed).then(|| {
            format!("Customer is {age} years old; the minimum age is {MIN_AGE}")
        }),
    })
}

/// Jurisdiction gate.
pub fn check_jurisdiction(denylist: &Denylist, jurisdiction: &JurisdictionId) -> JurisdictionGateResult {
    if denylist.contains(jurisdiction) {
        JurisdictionGateResult {
            allowed: false,
            reason: Some(format!(
                "Cannabis sales are not permitted in jurisdiction {jurisdiction}"
            )),
        }
    } else {
        JurisdictionGateResult {
            allowed: true,
            reason: None,
        }
    }
}

/// Checkout gate. Enforces nothing yet: every cart is allowed.
// TODO: per-jurisdiction purchase quantity limits once cart line items carry product weights.
pub fn check_checkout(_cart: &serde_json::Value) -> CheckoutResult {
    CheckoutResult {
        allowed: true,
        violations: Vec::new(),
        warnings: Vec::new(),
        errors: Vec::new(),
    }
}
