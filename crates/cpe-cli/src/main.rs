//! # cpe CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cpe_cli::check::{run_check, CheckArgs};
use cpe_cli::eval::{run_eval, EvalArgs};
use cpe_cli::gate::{run_gate, GateArgs};
use cpe_cli::packs::{run_packs, PacksArgs};

/// Content policy engine CLI.
///
/// Checks content against jurisdiction rule packs and a semantic
/// classifier, validates pack files, and scores golden corpora.
/// Classifier settings come from the CPE_CLASSIFIER_* environment
/// variables.
#[derive(Parser, Debug)]
#[command(name = "cpe", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory of pack YAML files. Overrides CPE_PACKS_DIR.
    #[arg(long, global = true)]
    packs: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check one piece of content.
    Check(CheckArgs),

    /// Evaluate the age or jurisdiction gate.
    Gate(GateArgs),

    /// Validate or list rule packs.
    Packs(PacksArgs),

    /// Score a golden corpus.
    Eval(EvalArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json || std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }

    let packs = cli.packs.as_deref();
    let result = match cli.command {
        Commands::Packs(args) => run_packs(&args, packs),
        Commands::Check(args) => {
            cpe_cli::build_engine(packs).and_then(|engine| run_check(&args, engine))
        }
        Commands::Gate(args) => {
            cpe_cli::build_engine(packs).and_then(|engine| run_gate(&args, &engine))
        }
        Commands::Eval(args) => {
            cpe_cli::build_engine(packs).and_then(|engine| run_eval(&args, engine))
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
