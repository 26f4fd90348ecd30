//! Verification gate — fingerprint, invariant assertions, and the audit log.
//!
//! A `VerificationBuilder` accumulates counts from each pipeline stage and is
//! finalized exactly once into an immutable `VerificationReport`. The report
//! is a pure value: it performs no I/O of its own beyond the explicit
//! `write` call, and a failing report must prevent the renderer from running.

use crate::model::TravelAdvisory;
use crate::policy::PolicyConfig;
use anyhow::{Context, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

/// Parse failures at or above this fraction of raw records fail verification.
pub const MAX_PARSE_FAILURE_RATE: f64 = 0.05;

/// Accumulates pipeline counts stage by stage; finalized once.
#[derive(Debug, Default)]
pub struct VerificationBuilder {
    raw_count: usize,
    parsed_count: usize,
    failed_titles: Vec<String>,
    duplicate_descriptions: Vec<String>,
    after_dedup_count: usize,
}

impl VerificationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the size of the raw record set.
    pub fn raw_records(&mut self, count: usize) {
        self.raw_count = count;
    }

    /// Record one discarded record by title.
    pub fn parse_failure(&mut self, title: &str) {
        self.failed_titles.push(title.to_string());
    }

    /// Record how many records parsed successfully.
    pub fn parsed_records(&mut self, count: usize) {
        self.parsed_count = count;
    }

    /// Record the dedup stage output: drop descriptions and surviving count.
    pub fn dedup_outcome(&mut self, descriptions: Vec<String>, survivors: usize) {
        self.duplicate_descriptions = descriptions;
        self.after_dedup_count = survivors;
    }

    /// Finalize into an immutable report: audit the prohibited table against
    /// the classified output, break down the high-risk set by level, compute
    /// the fingerprint, and evaluate every assertion (no short-circuit).
    pub fn finalize(
        self,
        policy: &PolicyConfig,
        prohibited: &[TravelAdvisory],
        high_risk: &[TravelAdvisory],
    ) -> VerificationReport {
        let mut prohibited_matched = Vec::new();
        let mut prohibited_unmatched = Vec::new();
        for entry in &policy.prohibited {
            let needle = entry.name.to_lowercase();
            match prohibited
                .iter()
                .find(|a| a.country_name.to_lowercase().contains(&needle))
            {
                Some(adv) => prohibited_matched.push((entry.name.clone(), adv.country_name.clone())),
                None => prohibited_unmatched.push(entry.name.clone()),
            }
        }

        let mut level_4_countries = Vec::new();
        let mut level_3_countries = Vec::new();
        let mut regional_countries = Vec::new();
        let mut high_risk_names = Vec::new();
        for adv in high_risk {
            high_risk_names.push(adv.country_name.clone());
            match adv.overall_level {
                4 => level_4_countries.push(adv.country_name.clone()),
                3 => level_3_countries.push(adv.country_name.clone()),
                _ => regional_countries.push(adv.country_name.clone()),
            }
        }

        let data_hash = fingerprint(prohibited.iter().chain(high_risk.iter()));
        let failures = run_assertions(
            policy,
            prohibited,
            high_risk,
            self.failed_titles.len(),
            self.raw_count,
        );

        VerificationReport {
            raw_count: self.raw_count,
            parsed_count: self.parsed_count,
            failed_titles: self.failed_titles,
            duplicate_descriptions: self.duplicate_descriptions,
            after_dedup_count: self.after_dedup_count,
            prohibited_expected: policy.prohibited.len(),
            prohibited_matched,
            prohibited_unmatched,
            level_4_countries,
            level_3_countries,
            regional_countries,
            high_risk_names,
            data_hash,
            failures,
        }
    }
}

/// Finalized verification outcome. Never mutated after `finalize`.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub raw_count: usize,
    pub parsed_count: usize,
    pub failed_titles: Vec<String>,
    pub duplicate_descriptions: Vec<String>,
    pub after_dedup_count: usize,
    pub prohibited_expected: usize,
    /// Policy name -> matched API entry name, in policy-table order.
    pub prohibited_matched: Vec<(String, String)>,
    pub prohibited_unmatched: Vec<String>,
    pub level_4_countries: Vec<String>,
    pub level_3_countries: Vec<String>,
    pub regional_countries: Vec<String>,
    pub high_risk_names: Vec<String>,
    /// SHA-256 content fingerprint over the classified output.
    pub data_hash: String,
    /// Assertion violations; empty means the gate is open.
    pub failures: Vec<String>,
}

impl VerificationReport {
    pub fn parse_failures(&self) -> usize {
        self.failed_titles.len()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.duplicate_descriptions.len()
    }

    /// True when every assertion held.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Render the audit log text: fixed section order, written on every run
    /// (pass or fail) before any other output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(70);

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "TRAVEL ADVISORY REPORT — VERIFICATION LOG");
        let _ = writeln!(out, "Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out, "{rule}");

        let _ = writeln!(out);
        let _ = writeln!(out, "--- PIPELINE STATS ---");
        let _ = writeln!(out, "Raw API entries:        {}", self.raw_count);
        let _ = writeln!(out, "Parsed successfully:    {}", self.parsed_count);
        let _ = writeln!(out, "Parse failures:         {}", self.parse_failures());
        for title in &self.failed_titles {
            let _ = writeln!(out, "  - {title}");
        }
        let _ = writeln!(out, "Duplicates removed:     {}", self.duplicates_removed());
        for desc in &self.duplicate_descriptions {
            let _ = writeln!(out, "  - {desc}");
        }
        let _ = writeln!(out, "After dedup:            {}", self.after_dedup_count);

        let _ = writeln!(out);
        let _ = writeln!(out, "--- PROHIBITED COUNTRY AUDIT (Texas EO GA-48) ---");
        let _ = writeln!(out, "Expected: {} countries", self.prohibited_expected);
        let _ = writeln!(out, "Matched:  {}", self.prohibited_matched.len());
        for (name, api_entry) in &self.prohibited_matched {
            let _ = writeln!(out, "  [OK]   {name} -> '{api_entry}'");
        }
        if !self.prohibited_unmatched.is_empty() {
            let _ = writeln!(out, "Unmatched: {}", self.prohibited_unmatched.len());
            for name in &self.prohibited_unmatched {
                let _ = writeln!(out, "  [MISS] {name} — no API entry found");
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "--- HIGH-RISK BREAKDOWN ---");
        let _ = writeln!(
            out,
            "Level 4 (Do Not Travel):       {}",
            self.level_4_countries.len()
        );
        for name in sorted(&self.level_4_countries) {
            let _ = writeln!(out, "  - {name}");
        }
        let _ = writeln!(
            out,
            "Level 3 (Reconsider Travel):   {}",
            self.level_3_countries.len()
        );
        for name in sorted(&self.level_3_countries) {
            let _ = writeln!(out, "  - {name}");
        }
        let _ = writeln!(
            out,
            "Regional warnings (L1/L2):     {}",
            self.regional_countries.len()
        );
        for name in sorted(&self.regional_countries) {
            let _ = writeln!(out, "  - {name}");
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "--- DATA HASH ---");
        let _ = writeln!(out, "SHA-256: {}", self.data_hash);

        let _ = writeln!(out);
        let _ = writeln!(out, "--- ASSERTIONS ---");
        if self.failures.is_empty() {
            let _ = writeln!(out, "ALL PASSED");
            let _ = writeln!(out, "  [OK] No prohibited countries leaked into high-risk list");
            let _ = writeln!(
                out,
                "  [OK] Parse failure rate within threshold ({}/{})",
                self.parse_failures(),
                self.raw_count
            );
            let _ = writeln!(
                out,
                "  [OK] High-risk countries found ({})",
                self.high_risk_names.len()
            );
            let _ = writeln!(out, "  [OK] No duplicate country codes after dedup");
        } else {
            let _ = writeln!(out, "FAILED ({} errors):", self.failures.len());
            for err in &self.failures {
                let _ = writeln!(out, "  [FAIL] {err}");
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{rule}");
        out
    }

    /// Write the audit log to disk.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())
            .with_context(|| format!("failed to write verification log: {}", path.display()))
    }
}

/// Deterministic SHA-256 fingerprint over a set of advisories.
///
/// Input order does not matter: entries are sorted by country code, falling
/// back to name when the code is empty, and each contributes
/// `code|name|level|iso-timestamp`.
pub fn fingerprint<'a>(advisories: impl IntoIterator<Item = &'a TravelAdvisory>) -> String {
    let mut sorted: Vec<&TravelAdvisory> = advisories.into_iter().collect();
    sorted.sort_by_key(|a| {
        if a.country_code.is_empty() {
            a.country_name.clone()
        } else {
            a.country_code.clone()
        }
    });

    let mut hasher = Sha256::new();
    for adv in sorted {
        let record = format!(
            "{}|{}|{}|{}",
            adv.country_code,
            adv.country_name,
            adv.overall_level,
            adv.last_updated.to_rfc3339()
        );
        hasher.update(record.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Evaluate the four mandatory assertions, accumulating every violation.
fn run_assertions(
    policy: &PolicyConfig,
    prohibited: &[TravelAdvisory],
    high_risk: &[TravelAdvisory],
    parse_failures: usize,
    raw_count: usize,
) -> Vec<String> {
    let mut failures = Vec::new();

    // 1. No prohibited country leaked into the high-risk list.
    for adv in high_risk {
        if policy.is_prohibited(&adv.country_name) {
            failures.push(format!(
                "LEAK: Prohibited country '{}' found in high-risk list",
                adv.country_name
            ));
        }
    }

    // 2. Parse failure rate strictly below 5% (skipped when no raw records).
    if raw_count > 0 {
        let rate = parse_failures as f64 / raw_count as f64;
        if rate >= MAX_PARSE_FAILURE_RATE {
            failures.push(format!(
                "PARSE FAILURES: {parse_failures}/{raw_count} ({:.1}%) exceeds 5% threshold",
                rate * 100.0
            ));
        }
    }

    // 3. At least one high-risk country found.
    if high_risk.is_empty() {
        failures.push("SANITY: Zero high-risk countries found".to_string());
    }

    // 4. No non-empty country code survives more than once.
    let mut seen: HashSet<&str> = HashSet::new();
    for adv in prohibited.iter().chain(high_risk.iter()) {
        if adv.country_code.is_empty() {
            continue;
        }
        if !seen.insert(&adv.country_code) {
            failures.push(format!(
                "DUPLICATE: Country code '{}' appears more than once",
                adv.country_code
            ));
        }
    }

    failures
}

fn sorted(names: &[String]) -> Vec<&String> {
    let mut v: Vec<&String> = names.iter().collect();
    v.sort();
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RegionalWarning;
    use chrono::{TimeZone, Utc};

    fn advisory(code: &str, name: &str, level: u8) -> TravelAdvisory {
        TravelAdvisory {
            country_name: name.to_string(),
            country_code: code.to_string(),
            overall_level: level,
            summary: String::new(),
            last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            link: String::new(),
            regional_warnings: vec![],
        }
    }

    fn finalize(
        builder: VerificationBuilder,
        prohibited: &[TravelAdvisory],
        high_risk: &[TravelAdvisory],
    ) -> VerificationReport {
        builder.finalize(&PolicyConfig::default(), prohibited, high_risk)
    }

    #[test]
    fn test_fingerprint_independent_of_order() {
        let a = advisory("MX", "Mexico", 2);
        let b = advisory("SO", "Somalia", 4);
        let c = advisory("", "Kosovo", 3);

        let forward = fingerprint([&a, &b, &c]);
        let reversed = fingerprint([&c, &b, &a]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_fingerprint_sensitive_to_content() {
        let a = advisory("MX", "Mexico", 2);
        let changed = advisory("MX", "Mexico", 3);
        assert_ne!(fingerprint([&a]), fingerprint([&changed]));
    }

    #[test]
    fn test_all_assertions_pass() {
        let mut builder = VerificationBuilder::new();
        builder.raw_records(100);
        builder.parsed_records(100);
        let high_risk = vec![advisory("SO", "Somalia", 4)];
        let report = finalize(builder, &[], &high_risk);
        assert!(report.passed());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_leak_detected() {
        let builder = VerificationBuilder::new();
        let high_risk = vec![advisory("RU", "Russia", 4), advisory("SO", "Somalia", 4)];
        let report = finalize(builder, &[], &high_risk);
        assert!(!report.passed());
        assert!(report.failures.iter().any(|f| f.starts_with("LEAK")));
    }

    #[test]
    fn test_parse_failure_rate_boundary() {
        // Exactly 5/100 = 5.0% must fail: the threshold is >= 5%, not > 5%.
        let mut builder = VerificationBuilder::new();
        builder.raw_records(100);
        builder.parsed_records(95);
        for i in 0..5 {
            builder.parse_failure(&format!("Bad record {i}"));
        }
        let high_risk = vec![advisory("SO", "Somalia", 4)];
        let report = finalize(builder, &[], &high_risk);
        assert!(report
            .failures
            .iter()
            .any(|f| f.starts_with("PARSE FAILURES")));
    }

    #[test]
    fn test_parse_failure_rate_below_threshold_passes() {
        let mut builder = VerificationBuilder::new();
        builder.raw_records(100);
        builder.parsed_records(96);
        for i in 0..4 {
            builder.parse_failure(&format!("Bad record {i}"));
        }
        let high_risk = vec![advisory("SO", "Somalia", 4)];
        let report = finalize(builder, &[], &high_risk);
        assert!(report.passed());
    }

    #[test]
    fn test_parse_failure_check_skipped_when_no_raw_records() {
        let builder = VerificationBuilder::new();
        let high_risk = vec![advisory("SO", "Somalia", 4)];
        let report = finalize(builder, &[], &high_risk);
        assert!(!report
            .failures
            .iter()
            .any(|f| f.starts_with("PARSE FAILURES")));
    }

    #[test]
    fn test_empty_high_risk_fails_sanity() {
        let builder = VerificationBuilder::new();
        let report = finalize(builder, &[], &[]);
        assert!(report.failures.iter().any(|f| f.starts_with("SANITY")));
    }

    #[test]
    fn test_duplicate_codes_detected() {
        let builder = VerificationBuilder::new();
        let prohibited = vec![advisory("RU", "Russia", 4)];
        let high_risk = vec![advisory("RU", "Ruritania", 4)];
        let report = finalize(builder, &prohibited, &high_risk);
        assert!(report.failures.iter().any(|f| f.starts_with("DUPLICATE")));
    }

    #[test]
    fn test_empty_codes_never_duplicates() {
        let builder = VerificationBuilder::new();
        let high_risk = vec![advisory("", "Kosovo", 4), advisory("", "Somaliland", 4)];
        let report = finalize(builder, &[], &high_risk);
        assert!(!report.failures.iter().any(|f| f.starts_with("DUPLICATE")));
    }

    #[test]
    fn test_assertions_accumulate_without_short_circuit() {
        let mut builder = VerificationBuilder::new();
        builder.raw_records(10);
        builder.parse_failure("Bad record");
        let report = finalize(builder, &[], &[]);
        // Both the failure-rate and the sanity assertion must be reported.
        assert!(report.failures.len() >= 2);
    }

    #[test]
    fn test_prohibited_audit_matches_compound_entries() {
        let builder = VerificationBuilder::new();
        let prohibited = vec![advisory("", "Mainland China, Hong Kong & Macau", 0)];
        let high_risk = vec![advisory("SO", "Somalia", 4)];
        let report = finalize(builder, &prohibited, &high_risk);
        assert!(report
            .prohibited_matched
            .iter()
            .any(|(name, api)| name == "China" && api.contains("Mainland China")));
        assert!(report.prohibited_unmatched.contains(&"Russia".to_string()));
    }

    #[test]
    fn test_regional_breakdown_bucket() {
        let builder = VerificationBuilder::new();
        let mut elevated = advisory("MX", "Mexico", 2);
        elevated.regional_warnings.push(RegionalWarning {
            region_name: "Guerrero".to_string(),
            level: 4,
            reasons: String::new(),
        });
        let high_risk = vec![advisory("SO", "Somalia", 4), elevated];
        let report = finalize(builder, &[], &high_risk);
        assert_eq!(report.level_4_countries, vec!["Somalia"]);
        assert_eq!(report.regional_countries, vec!["Mexico"]);
    }

    #[test]
    fn test_render_sections_in_order() {
        let mut builder = VerificationBuilder::new();
        builder.raw_records(2);
        builder.parsed_records(2);
        let high_risk = vec![advisory("SO", "Somalia", 4)];
        let report = finalize(builder, &[], &high_risk);
        let text = report.render();

        let stats = text.find("--- PIPELINE STATS ---").unwrap();
        let audit = text.find("--- PROHIBITED COUNTRY AUDIT").unwrap();
        let breakdown = text.find("--- HIGH-RISK BREAKDOWN ---").unwrap();
        let hash = text.find("--- DATA HASH ---").unwrap();
        let assertions = text.find("--- ASSERTIONS ---").unwrap();
        assert!(stats < audit && audit < breakdown && breakdown < hash && hash < assertions);
        assert!(text.contains("ALL PASSED"));
    }

    #[test]
    fn test_write_creates_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.verification.txt");

        let builder = VerificationBuilder::new();
        let high_risk = vec![advisory("SO", "Somalia", 4)];
        let report = finalize(builder, &[], &high_risk);
        report.write(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("SHA-256:"));
    }
}
