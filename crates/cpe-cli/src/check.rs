//! # Check Subcommand
//!
//! One content check from the command line. Content comes from the
//! positional argument, or from stdin when the argument is `-` or absent.
//! The result is printed as JSON.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Args;
use cpe_core::ComplianceStatus;
use cpe_engine::{ComplianceEngine, MessageCheckRequest};

/// Arguments for `cpe check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Jurisdiction code, e.g. NY.
    #[arg(short, long)]
    pub jurisdiction: String,

    /// Distribution channel. Defaults to retail.
    #[arg(short, long, default_value = "")]
    pub channel: String,

    /// Print the message-check view (`ok`, `reason`) instead of the full result.
    #[arg(long)]
    pub message: bool,

    /// Content to check. `-` or omitted reads stdin.
    #[arg(value_name = "CONTENT")]
    pub content: Option<String>,
}

/// Execute `cpe check`. Exit code 1 when the content must not be published.
pub fn run_check(args: &CheckArgs, engine: ComplianceEngine) -> Result<u8> {
    let content = match args.content.as_deref() {
        Some(c) if c != "-" => c.to_string(),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read content from stdin")?;
            buf
        }
    };

    let rt = crate::runtime()?;
    if args.message {
        let req = MessageCheckRequest {
            org_id: String::new(),
            channel: args.channel.clone(),
            jurisdiction: args.jurisdiction.clone(),
            content,
        };
        let out = rt.block_on(engine.check_message(&req));
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(if out.ok { 0 } else { 1 });
    }

    let result = rt.block_on(engine.check_content(&args.jurisdiction, &args.channel, &content));
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(exit_code(result.status))
}

fn exit_code(status: ComplianceStatus) -> u8 {
    match status {
        ComplianceStatus::Fail => 1,
        ComplianceStatus::Pass | ComplianceStatus::Warning => 0,
    }
}
