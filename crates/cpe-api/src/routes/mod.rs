//! # API Route Modules
//!
//! - `compliance`: content, message, age, jurisdiction and checkout checks.
//! - `packs`: rule pack listing and reload.

pub mod compliance;
pub mod packs;
