//! Render the classified advisory set into a Markdown report.
//!
//! Invoked only after the verification gate passes. Section order mirrors
//! the presentation contract: summary statistics, the prohibited section
//! first, a quick reference by level, then detailed per-country entries.

use crate::model::TravelAdvisory;
use crate::pipeline::classify::RiskStats;
use crate::policy::{level_name, PolicyConfig};
use anyhow::{Context, Result};
use chrono::Utc;
use std::fmt::Write as _;
use std::path::Path;

/// Write the Markdown report to `path`.
pub fn write_report(
    path: &Path,
    policy: &PolicyConfig,
    prohibited: &[TravelAdvisory],
    high_risk: &[TravelAdvisory],
    stats: &RiskStats,
) -> Result<()> {
    let report = render(policy, prohibited, high_risk, stats);
    std::fs::write(path, report)
        .with_context(|| format!("failed to write report: {}", path.display()))
}

/// Render the full report as a Markdown string.
pub fn render(
    policy: &PolicyConfig,
    prohibited: &[TravelAdvisory],
    high_risk: &[TravelAdvisory],
    stats: &RiskStats,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Travel Advisory Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "Areas of high risk, per US Department of State advisories.");
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated: {}", Utc::now().format("%B %d, %Y at %H:%M UTC"));
    let _ = writeln!(out);

    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "| | Count |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Prohibited (Texas EO GA-48) | {} |", stats.prohibited);
    let _ = writeln!(out, "| Level 4 (Do Not Travel) | {} |", stats.level_4);
    let _ = writeln!(out, "| Level 3 (Reconsider Travel) | {} |", stats.level_3);
    let _ = writeln!(out, "| Regional warnings (L1/L2) | {} |", stats.regional);
    let _ = writeln!(out, "| Total entries | {} |", stats.total);
    let _ = writeln!(out);

    render_prohibited_section(&mut out, policy, prohibited);
    render_quick_reference(&mut out, high_risk);

    let _ = writeln!(out, "## Detailed Advisories");
    let _ = writeln!(out);
    for adv in high_risk {
        render_entry(&mut out, adv);
    }

    out
}

/// The prohibited section always comes first and lists the full policy
/// table, whether or not an API entry matched each designation.
fn render_prohibited_section(out: &mut String, policy: &PolicyConfig, prohibited: &[TravelAdvisory]) {
    let _ = writeln!(out, "## Prohibited - Travel Not Authorized");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Per 15 CFR 791.4, the US Department of Commerce has designated the \
         following countries as foreign adversaries. Texas Executive Order \
         GA-48 (November 19, 2024) prohibits state employees from \
         work-related travel to these countries."
    );
    let _ = writeln!(out);

    for entry in &policy.prohibited {
        let needle = entry.name.to_lowercase();
        let matching = prohibited
            .iter()
            .find(|a| a.country_name.to_lowercase().contains(&needle));

        if entry.includes.is_empty() {
            let _ = writeln!(out, "### {}", entry.name);
        } else {
            let _ = writeln!(out, "### {} (including {})", entry.name, entry.includes.join(", "));
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "*Official: {}*", entry.official_name);
        let _ = writeln!(out);

        if let Some(adv) = matching {
            if adv.overall_level > 0 {
                let _ = writeln!(
                    out,
                    "State Dept Advisory: Level {} - {}",
                    adv.overall_level,
                    level_name(adv.overall_level)
                );
            }
            let _ = writeln!(out, "Last Updated: {}", adv.last_updated.format("%B %d, %Y"));
            let _ = writeln!(out);
        }
    }
}

fn render_quick_reference(out: &mut String, high_risk: &[TravelAdvisory]) {
    let _ = writeln!(out, "## Quick Reference - Countries by Risk Level");
    let _ = writeln!(out);

    for level in [4u8, 3, 2, 1] {
        let mut names: Vec<&str> = high_risk
            .iter()
            .filter(|a| a.overall_level == level)
            .map(|a| a.country_name.as_str())
            .collect();
        if names.is_empty() {
            continue;
        }
        names.sort_unstable();

        let _ = writeln!(
            out,
            "**Level {level}: {}** ({} countries)",
            level_name(level),
            names.len()
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", names.join(", "));
        let _ = writeln!(out);
    }
}

fn render_entry(out: &mut String, adv: &TravelAdvisory) {
    let _ = writeln!(out, "### {} - Level {}", adv.country_name, adv.overall_level);
    let _ = writeln!(out);
    let _ = writeln!(out, "*{}*", level_name(adv.overall_level));
    let _ = writeln!(out);
    let _ = writeln!(out, "Last Updated: {}", adv.last_updated.format("%B %d, %Y"));
    let _ = writeln!(out);

    // Level-4 regions first, then level-3.
    for (level, heading) in [(4u8, "Do Not Travel Regions:"), (3, "Reconsider Travel Regions:")] {
        let regions: Vec<_> = adv
            .regional_warnings
            .iter()
            .filter(|w| w.level == level)
            .collect();
        if regions.is_empty() {
            continue;
        }
        let _ = writeln!(out, "**{heading}**");
        let _ = writeln!(out);
        for warning in regions {
            if warning.reasons.is_empty() {
                let _ = writeln!(out, "- {}", warning.region_name);
            } else {
                let _ = writeln!(out, "- {} (due to {})", warning.region_name, warning.reasons);
            }
        }
        let _ = writeln!(out);
    }

    if !adv.link.is_empty() {
        let _ = writeln!(out, "[Full Advisory]({})", adv.link);
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "---");
    let _ = writeln!(out);
}
