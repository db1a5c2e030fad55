//! # Packs Subcommand
//!
//! - `cpe packs validate <PATH>` parses and compiles a pack file or
//!   directory exactly as the engine would load it.
//! - `cpe packs list` prints every loaded pack with its status, built-in
//!   or from `--packs`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use cpe_pack::{load_pack_dir, load_pack_file, PackSummary, RulePackStore};

/// Arguments for `cpe packs`.
#[derive(Args, Debug)]
pub struct PacksArgs {
    #[command(subcommand)]
    pub command: PacksCommand,
}

#[derive(Subcommand, Debug)]
pub enum PacksCommand {
    /// Parse and compile a pack file or directory.
    Validate {
        /// Pack YAML file or directory of them.
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// List loaded packs.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

/// Execute `cpe packs`.
pub fn run_packs(args: &PacksArgs, packs_dir: Option<&Path>) -> Result<u8> {
    match &args.command {
        PacksCommand::Validate { path } => Ok(validate(path)),
        PacksCommand::List { json } => {
            let store = match packs_dir {
                Some(dir) => RulePackStore::from_dir(dir)?,
                None => RulePackStore::builtin()?,
            };
            let summaries = store.summaries();
            if *json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                print!("{}", format_table(&summaries));
            }
            Ok(0)
        }
    }
}

/// Returns 0 when every pack loads and compiles, 1 otherwise.
fn validate(path: &Path) -> u8 {
    let loaded = if path.is_dir() {
        load_pack_dir(path)
    } else {
        load_pack_file(path)
    };
    match loaded.and_then(RulePackStore::from_packs) {
        Ok(store) => {
            println!("{}", ok_line(&store, path));
            0
        }
        Err(e) => {
            println!("FAIL: {}: {e}", path.display());
            1
        }
    }
}

fn ok_line(store: &RulePackStore, path: &Path) -> String {
    format!(
        "OK: {} pack(s), {} enforced, from {}",
        store.len(),
        store.active_len(),
        path.display()
    )
}

fn format_table(summaries: &[PackSummary]) -> String {
    let mut out = format!(
        "{:<6} {:<12} {:>7} {:<10} {:>5}  {}\n",
        "JUR", "CHANNEL", "VERSION", "STATUS", "RULES", "DIGEST"
    );
    for s in summaries {
        out.push_str(&format!(
            "{:<6} {:<12} {:>7} {:<10} {:>5}  {}\n",
            s.jurisdiction,
            s.channel,
            s.version,
            s.status.as_str(),
            s.rule_count,
            &s.digest[..12.min(s.digest.len())]
        ));
    }
    out
}
