#![deny(missing_docs)]

//! # cpe-core: Foundational Types for the Content Policy Engine
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies, only `serde`, `serde_json`,
//! `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for addressing primitives.** A [`JurisdictionId`] is
//!    normalized (trimmed, upper-cased) at construction, and a [`Channel`] is
//!    normalized (trimmed, lower-cased, empty means `retail`). Lookups never
//!    have to care about caller casing.
//!
//! 2. **One result contract.** [`ComplianceResult`] is the only value either
//!    check stage produces. Both sequences are always present.
//!
//! 3. **Untrusted output goes through [`validate_result`].** Anything that did
//!    not originate from this workspace's own constructors (classifier output,
//!    recorded regression results) is schema-checked before use.
//!
//! 4. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod error;
pub mod jurisdiction;
pub mod result;
pub mod temporal;
pub mod validate;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{ResultValidationError, ValidationError};
pub use jurisdiction::{Channel, JurisdictionId};
pub use result::{
    ComplianceResult, ComplianceStatus, MANUAL_REVIEW_SUGGESTION, SYSTEM_ERROR_PREFIX,
};
pub use temporal::{age_on, parse_birth_date, today_utc};
pub use validate::validate_result;
