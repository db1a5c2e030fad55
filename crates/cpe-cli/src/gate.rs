//! # Gate Subcommand
//!
//! `cpe gate age` and `cpe gate jurisdiction`, printing the gate result as
//! JSON. Exit code 1 when the gate denies.

use anyhow::Result;
use clap::{Args, Subcommand};
use cpe_engine::ComplianceEngine;

/// Arguments for `cpe gate`.
#[derive(Args, Debug)]
pub struct GateArgs {
    #[command(subcommand)]
    pub command: GateCommand,
}

#[derive(Subcommand, Debug)]
pub enum GateCommand {
    /// Minimum-age gate.
    Age {
        /// Birth date, YYYY-MM-DD or RFC 3339.
        #[arg(long)]
        birth_date: String,
        /// Jurisdiction code.
        #[arg(short, long)]
        jurisdiction: String,
    },
    /// Jurisdiction prohibition gate.
    Jurisdiction {
        /// Jurisdiction code.
        jurisdiction: String,
    },
}

/// Execute `cpe gate`.
pub fn run_gate(args: &GateArgs, engine: &ComplianceEngine) -> Result<u8> {
    let allowed = match &args.command {
        GateCommand::Age {
            birth_date,
            jurisdiction,
        } => {
            let r = engine.check_age(birth_date, jurisdiction)?;
            println!("{}", serde_json::to_string_pretty(&r)?);
            r.allowed
        }
        GateCommand::Jurisdiction { jurisdiction } => {
            let r = engine.check_jurisdiction_allowed(jurisdiction);
            println!("{}", serde_json::to_string_pretty(&r)?);
            r.allowed
        }
    };
    Ok(if allowed { 0 } else { 1 })
}
