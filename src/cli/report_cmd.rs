//! `advisory-report` — fetch advisories, run the pipeline, write the report.

use crate::cli::output::{self, Styled};
use crate::fetch::{AdvisorySource, FetchError};
use crate::pipeline::{self, PipelineOutcome};
use crate::policy::PolicyConfig;
use crate::render;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Run failure, mapped by `main` to the process exit code: fetch failures
/// are exit 1 (nothing written), verification failures exit 2 (the audit
/// log is already on disk, rendering skipped).
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("verification failed with {failures} assertion error(s); log at {}", .log_path.display())]
    Verification { failures: usize, log_path: PathBuf },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Fetch, run the core pipeline, write the audit log, and render.
///
/// The audit log is written before any other output, pass or fail. The
/// report is rendered only when the verification gate is open.
pub async fn run(
    source: &dyn AdvisorySource,
    policy: &PolicyConfig,
    output_path: &Path,
    list_only: bool,
) -> Result<(), RunError> {
    let s = Styled::new();

    if !output::is_quiet() && !output::is_json() {
        eprintln!("  Fetching travel advisories from the US State Department...");
    }
    let records = source.fetch().await?;

    let outcome = pipeline::run(&records, policy);
    let verification_path = verification_log_path(output_path);
    outcome
        .verification
        .write(&verification_path)
        .map_err(RunError::Other)?;

    if output::is_json() {
        print_json_summary(&outcome, &verification_path);
    } else if !output::is_quiet() {
        print_summary(&outcome);
    }

    if list_only {
        if !output::is_json() {
            eprint!("{}", render_listing(&s, policy, &outcome));
        }
        return Ok(());
    }

    if !outcome.verification.passed() {
        if !output::is_json() {
            eprintln!();
            eprintln!("  {} {}", s.fail_sym(), s.bold("VERIFICATION FAILED"));
            for err in &outcome.verification.failures {
                eprintln!("    {} {err}", s.fail_sym());
            }
            eprintln!();
            eprintln!("  Verification log: {}", verification_path.display());
        }
        return Err(RunError::Verification {
            failures: outcome.verification.failures.len(),
            log_path: verification_path,
        });
    }

    render::write_report(
        output_path,
        policy,
        &outcome.classification.prohibited,
        &outcome.classification.high_risk,
        &outcome.classification.stats,
    )?;

    if !output::is_quiet() && !output::is_json() {
        eprintln!();
        eprintln!(
            "  {} {}",
            s.ok_sym(),
            s.green(&format!("Report saved to: {}", output_path.display()))
        );
        eprintln!("  Verification log: {}", verification_path.display());
        eprintln!(
            "  Data hash: {}",
            s.dim(&outcome.verification.data_hash)
        );
    }

    Ok(())
}

/// The audit log path derives from the report path: `report.md` sits next
/// to `report.verification.txt`.
pub fn verification_log_path(output_path: &Path) -> PathBuf {
    output_path.with_extension("verification.txt")
}

fn print_summary(outcome: &PipelineOutcome) {
    let stats = &outcome.classification.stats;
    let verification = &outcome.verification;

    eprintln!(
        "  Retrieved {} advisories; {} parsed, {} failed, {} duplicate(s) removed.",
        verification.raw_count,
        verification.parsed_count,
        verification.parse_failures(),
        verification.duplicates_removed(),
    );
    eprintln!();
    eprintln!("  Prohibited countries (Texas EO GA-48): {}", stats.prohibited);
    eprintln!("  High-risk destinations:");
    eprintln!("    Level 4 (Do Not Travel):       {}", stats.level_4);
    eprintln!("    Level 3 (Reconsider Travel):   {}", stats.level_3);
    eprintln!("    Regional warnings (L1/L2):     {}", stats.regional);
}

fn render_listing(s: &Styled, policy: &PolicyConfig, outcome: &PipelineOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", s.bold("PROHIBITED COUNTRIES (Texas EO GA-48)"));
    for entry in &policy.prohibited {
        let tag = s.red("[PROHIBITED]");
        if entry.includes.is_empty() {
            let _ = writeln!(out, "  {tag} {}", entry.name);
        } else {
            let _ = writeln!(out, "  {tag} {} (incl. {})", entry.name, entry.includes.join(", "));
        }
    }
    for name in &outcome.verification.prohibited_unmatched {
        let _ = writeln!(out, "  {} {name}: no matching advisory entry", s.warn_sym());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", s.bold("HIGH-RISK COUNTRIES"));
    for adv in &outcome.classification.high_risk {
        let tag = format!("[L{}]", adv.overall_level);
        let tag = match adv.overall_level {
            4 => s.red(&tag),
            3 => s.yellow(&tag),
            _ => tag,
        };
        let marker = if adv.has_regional_elevation() { "*" } else { " " };
        let _ = writeln!(out, "  {tag}{marker} {}", adv.country_name);
        if adv.has_regional_elevation() && output::is_verbose() {
            for w in adv.regional_warnings.iter().take(3) {
                if w.level > adv.overall_level {
                    let _ = writeln!(out, "        -> L{}: {}", w.level, w.region_name);
                }
            }
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  * = has elevated regional warnings");
    let _ = writeln!(out);
    let _ = writeln!(out, "  Data hash: {}", s.dim(&outcome.verification.data_hash));
    out
}

fn print_json_summary(outcome: &PipelineOutcome, verification_path: &Path) {
    let verification = &outcome.verification;
    output::print_json(&serde_json::json!({
        "stats": outcome.classification.stats,
        "raw": verification.raw_count,
        "parsed": verification.parsed_count,
        "parse_failures": verification.parse_failures(),
        "duplicates_removed": verification.duplicates_removed(),
        "prohibited": outcome.classification.prohibited.iter()
            .map(|a| a.country_name.as_str()).collect::<Vec<_>>(),
        "high_risk": outcome.classification.high_risk.iter()
            .map(|a| a.country_name.as_str()).collect::<Vec<_>>(),
        "data_hash": verification.data_hash,
        "verification_passed": verification.passed(),
        "verification_failures": verification.failures,
        "verification_log": verification_path.display().to_string(),
    }));
}
