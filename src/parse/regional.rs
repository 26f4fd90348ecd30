//! Heuristic extraction of region-specific warnings from advisory prose.
//!
//! State Department summaries phrase sub-national escalations as
//! "Do not travel to X due to Y" (level 4) or "Reconsider travel to X due to
//! Y" (level 3). The exclusion rules are deliberately explicit, named lists
//! so each can be tested on its own and the heuristic's false-positive
//! behavior stays reproducible.

use crate::model::RegionalWarning;
use crate::text::clean_html;
use regex::Regex;
use std::sync::LazyLock;

/// Phrases that mark a statement as country-wide rather than regional.
pub const SKIP_PHRASES: &[&str] = &["country", "nation", "all of", "anywhere", "entire"];

/// Vague references that do not name an actual region.
pub const VAGUE_PHRASES: &[&str] = &["these areas", "this area", "the area", "certain areas"];

/// Minimum accepted region-name length, in characters, after cleanup.
pub const MIN_REGION_LEN: usize = 3;

/// Maximum accepted region-name length, in characters, after cleanup.
pub const MAX_REGION_LEN: usize = 200;

static DO_NOT_TRAVEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)do\s+not\s+travel\s+to[:\s]+(.+?)\s+due\s+to\s+([^.]+)").unwrap()
});

static RECONSIDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)reconsider\s+travel\s+to[:\s]+(.+?)\s+due\s+to\s+([^.]+)").unwrap()
});

static LEADING_ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:the|a|an)\s+").unwrap());

static LEADING_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-:*]\s*").unwrap());

/// Extract regional warnings from a raw advisory summary.
///
/// The summary is normalized first. The level-4 pass runs only when the
/// overall level is below 4, the level-3 pass only when below 3 — an
/// advisory never "regionally warns" about its own already-declared level.
/// Both passes run independently; surviving level-4 candidates precede
/// level-3 ones and no cross-level merge is performed.
pub fn extract_regional_warnings(summary: &str, overall_level: u8) -> Vec<RegionalWarning> {
    let text = clean_html(summary);
    let mut warnings = Vec::new();

    if overall_level < 4 {
        collect_pattern(&DO_NOT_TRAVEL_RE, &text, 4, &mut warnings);
    }
    if overall_level < 3 {
        collect_pattern(&RECONSIDER_RE, &text, 3, &mut warnings);
    }

    warnings
}

fn collect_pattern(re: &Regex, text: &str, level: u8, warnings: &mut Vec<RegionalWarning>) {
    for caps in re.captures_iter(text) {
        let raw_region = caps[1].trim();
        let reasons = caps[2].trim();

        let Some(region) = clean_region_name(raw_region) else {
            continue;
        };

        // Containment dedup: a candidate already named (even as part of a
        // longer accepted name) is dropped.
        let region_lower = region.to_lowercase();
        if warnings
            .iter()
            .any(|w| w.region_name.to_lowercase().contains(&region_lower))
        {
            continue;
        }

        warnings.push(RegionalWarning {
            region_name: region,
            level,
            reasons: reasons.to_string(),
        });
    }
}

/// Apply the exclusion rules to a captured region name.
///
/// Returns the cleaned name, or `None` when the candidate is country-wide,
/// vague, or outside the accepted length bounds.
fn clean_region_name(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    if SKIP_PHRASES.iter().any(|p| lower.contains(p)) {
        return None;
    }

    let region = LEADING_ARTICLE_RE.replace(raw, "");
    let region = LEADING_PUNCT_RE.replace(&region, "");
    let region = region.trim().to_string();

    let lower = region.to_lowercase();
    if VAGUE_PHRASES.iter().any(|p| lower.contains(p)) {
        return None;
    }

    let len = region.chars().count();
    if !(MIN_REGION_LEN..=MAX_REGION_LEN).contains(&len) {
        return None;
    }

    Some(region)
}
