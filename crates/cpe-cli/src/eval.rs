//! # Eval Subcommand
//!
//! Regression harness: run a golden corpus of labelled content through the
//! engine and score it.
//!
//! ## Corpus format
//!
//! ```yaml
//! threshold: 0.95        # optional, default 1.0
//! timeout_secs: 30       # optional per-case bound, default 30
//! cases:
//!   - name: ny-guaranteed-relief
//!     jurisdiction: NY
//!     channel: retail      # optional
//!     content: "Guaranteed relief tonight"
//!     expect: fail         # pass | fail | warning
//! ```
//!
//! Each case runs in its own task. A case that panics, exceeds its
//! timeout, or yields a result that fails schema validation is counted as
//! failed and marked aborted. The run exits 1 when `score < threshold` or
//! any case aborted.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use cpe_core::{validate_result, ComplianceStatus};
use cpe_engine::ComplianceEngine;
use serde::{Deserialize, Serialize};

const DEFAULT_CASE_TIMEOUT_SECS: u64 = 30;

/// Arguments for `cpe eval`.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Corpus YAML file.
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Minimum passing score in [0, 1]. Overrides the corpus value.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Per-case timeout in seconds. Overrides the corpus value.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Write the full report as JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// A golden corpus.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Corpus {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    pub cases: Vec<EvalCase>,
}

/// One labelled piece of content.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalCase {
    pub name: String,
    pub jurisdiction: String,
    #[serde(default)]
    pub channel: String,
    pub content: String,
    pub expect: ComplianceStatus,
}

/// How one case ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Status matched the label.
    Passed,
    /// Status differed from the label.
    Mismatch {
        expected: ComplianceStatus,
        actual: ComplianceStatus,
        violations: Vec<String>,
    },
    /// Task panicked, timed out, or produced a schema-invalid result.
    Aborted { reason: String },
}

/// Per-case line of the report.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: CaseOutcome,
}

/// Whole-run report.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub aborted: usize,
    pub score: f64,
    pub threshold: f64,
    pub cases: Vec<CaseReport>,
}

impl EvalReport {
    /// The run passes when the score meets the threshold and nothing aborted.
    pub fn succeeded(&self) -> bool {
        self.aborted == 0 && self.score >= self.threshold
    }
}

/// Parse and sanity-check a corpus file.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read corpus {}", path.display()))?;
    let corpus: Corpus = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse corpus {}", path.display()))?;
    if corpus.cases.is_empty() {
        bail!("corpus {} has no cases", path.display());
    }
    if let Some(t) = corpus.threshold {
        check_threshold(t)?;
    }
    Ok(corpus)
}

fn check_threshold(t: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&t) {
        bail!("threshold must be within [0, 1], got {t}");
    }
    Ok(())
}

/// Run one case in its own task, bounded by `timeout`.
async fn run_case(engine: Arc<ComplianceEngine>, case: EvalCase, timeout: Duration) -> CaseReport {
    let name = case.name.clone();
    let expected = case.expect;
    let mut handle = tokio::spawn(async move {
        engine
            .check_content(&case.jurisdiction, &case.channel, &case.content)
            .await
    });

    let outcome = match tokio::time::timeout(timeout, &mut handle).await {
        Err(_) => {
            handle.abort();
            CaseOutcome::Aborted {
                reason: format!("timed out after {}s", timeout.as_secs_f64()),
            }
        }
        Ok(Err(join_err)) if join_err.is_panic() => CaseOutcome::Aborted {
            reason: "case panicked".to_string(),
        },
        Ok(Err(join_err)) => CaseOutcome::Aborted {
            reason: format!("case task failed: {join_err}"),
        },
        Ok(Ok(result)) => {
            // Re-validate what the engine returned as if it came off the wire.
            let checked = serde_json::to_value(&result)
                .map_err(|e| e.to_string())
                .and_then(|v| validate_result(&v).map_err(|e| e.to_string()));
            match checked {
                Err(reason) => CaseOutcome::Aborted {
                    reason: format!("schema-invalid result: {reason}"),
                },
                Ok(r) if r.status == expected => CaseOutcome::Passed,
                Ok(r) => CaseOutcome::Mismatch {
                    expected,
                    actual: r.status,
                    violations: r.violations,
                },
            }
        }
    };

    match &outcome {
        CaseOutcome::Passed => tracing::debug!(case = %name, "case passed"),
        CaseOutcome::Mismatch { actual, .. } => {
            tracing::info!(case = %name, expected = %expected.as_str(), actual = %actual.as_str(), "case mismatch")
        }
        CaseOutcome::Aborted { reason } => tracing::warn!(case = %name, %reason, "case aborted"),
    }
    CaseReport { name, outcome }
}

/// Run every case of `corpus` in order and score the run.
pub async fn evaluate(
    engine: Arc<ComplianceEngine>,
    corpus: &Corpus,
    threshold: f64,
    timeout: Duration,
) -> EvalReport {
    let mut cases = Vec::with_capacity(corpus.cases.len());
    for case in &corpus.cases {
        cases.push(run_case(engine.clone(), case.clone(), timeout).await);
    }

    let total = cases.len();
    let passed = cases
        .iter()
        .filter(|c| c.outcome == CaseOutcome::Passed)
        .count();
    let aborted = cases
        .iter()
        .filter(|c| matches!(c.outcome, CaseOutcome::Aborted { .. }))
        .count();
    let score = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    };

    EvalReport {
        total,
        passed,
        failed: total - passed,
        aborted,
        score,
        threshold,
        cases,
    }
}

/// Execute `cpe eval`.
pub fn run_eval(args: &EvalArgs, engine: ComplianceEngine) -> Result<u8> {
    let corpus = load_corpus(&args.corpus)?;
    let threshold = args.threshold.or(corpus.threshold).unwrap_or(1.0);
    check_threshold(threshold)?;
    let timeout = Duration::from_secs(
        args.timeout_secs
            .or(corpus.timeout_secs)
            .unwrap_or(DEFAULT_CASE_TIMEOUT_SECS),
    );

    let rt = crate::runtime()?;
    let report = rt.block_on(evaluate(Arc::new(engine), &corpus, threshold, timeout));

    for case in &report.cases {
        match &case.outcome {
            CaseOutcome::Passed => println!("  PASS  {}", case.name),
            CaseOutcome::Mismatch {
                expected, actual, ..
            } => println!(
                "  FAIL  {}: expected {}, got {}",
                case.name,
                expected.as_str(),
                actual.as_str()
            ),
            CaseOutcome::Aborted { reason } => println!("  ERROR {}: {reason}", case.name),
        }
    }
    println!(
        "\nScore: {}/{} ({:.3}), threshold {:.3}, aborted {}",
        report.passed, report.total, report.score, report.threshold, report.aborted
    );

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    Ok(if report.succeeded() { 0 } else { 1 })
}
