//! # cpe-pack: Rule Pack Store
//!
//! Versioned, jurisdiction- and channel-scoped collections of pattern rules,
//! and the store that resolves a `(jurisdiction, channel)` pair to exactly
//! one of them.
//!
//! - **Rules** (`rule.rs`): the closed set of matcher kinds, authored
//!   ([`Rule`]) and compiled ([`CompiledRule`]).
//! - **Packs** (`pack.rs`): [`RulePack`] and its compiled, digested form
//!   [`CompiledPack`].
//! - **Parser** (`parser.rs`): YAML loading with file-path error context.
//! - **Store** (`store.rs`): [`RulePackStore`] lookup with retail and
//!   empty-pack fallback, and [`PackRegistry`] for wholesale reload.
//!
//! ## Crate Policy
//!
//! - Depends only on `cpe-core` internally.
//! - Every pattern is compiled at load time. Matching never fails.
//! - Absence of configuration is a valid state: resolution always returns a
//!   pack, possibly with no rules.

pub mod error;
pub mod pack;
pub mod parser;
pub mod rule;
pub mod store;

pub use error::{PackError, PackResult};
pub use pack::{CompiledPack, PackStatus, RulePack};
pub use parser::{load_pack_dir, load_pack_file, parse_packs_str};
pub use rule::{CompiledRule, Rule};
pub use store::{PackRegistry, PackSummary, RulePackStore};
