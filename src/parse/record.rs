//! Assemble one raw API record into a structured advisory.

use crate::model::{RawRecord, TravelAdvisory};
use crate::parse::regional::extract_regional_warnings;
use crate::parse::title::parse_title;
use crate::policy::PolicyConfig;
use crate::text::clean_html;
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};

/// Parse a raw record into a `TravelAdvisory`.
///
/// Returns `None` (a counted parse failure) when the title carries no level
/// and the name does not match a prohibited country. Level-0 entries that do
/// match are retained so compound headings like "Mainland China, Hong Kong &
/// Macau - See Summaries" still route to the prohibited list. A bad record
/// never aborts the run.
pub fn parse_record(raw: &RawRecord, policy: &PolicyConfig) -> Option<TravelAdvisory> {
    let (country_name, overall_level) = parse_title(&raw.title);

    if overall_level == 0 {
        if policy.is_prohibited(&country_name) {
            info!("keeping level-0 prohibited entry: {}", raw.title);
        } else {
            warn!("skipping unparseable advisory (no level): {}", raw.title);
            return None;
        }
    }

    let country_code = raw.category.first().cloned().unwrap_or_default();
    let last_updated = parse_timestamp(raw.timestamp_str());
    let regional_warnings = extract_regional_warnings(&raw.summary, overall_level);

    Some(TravelAdvisory {
        country_name,
        country_code,
        overall_level,
        summary: clean_html(&raw.summary),
        last_updated,
        link: raw.link_or_id().to_string(),
        regional_warnings,
    })
}

/// Parse an ISO-8601 timestamp, tolerating a trailing "Z" zone marker and a
/// missing offset. A failed parse substitutes the current wall-clock time
/// rather than dropping the record.
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }
    Utc::now()
}
