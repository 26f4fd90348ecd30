//! Core data model — raw API records and structured advisories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw record as returned by the advisories API.
///
/// All fields default to empty so that sparse or irregular records still
/// deserialize; the record parser decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    /// Advisory title, e.g. "Mexico - Level 2: Exercise Increased Caution".
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Category list; the first element is the ISO country code when present.
    #[serde(rename = "Category", default)]
    pub category: Vec<String>,
    /// Advisory summary, usually HTML.
    #[serde(rename = "Summary", default)]
    pub summary: String,
    /// Link to the full advisory.
    #[serde(rename = "Link", default)]
    pub link: String,
    /// Record identifier, used as a link fallback.
    #[serde(rename = "id", default)]
    pub id: String,
    /// Last-updated timestamp (ISO-8601, may carry a trailing "Z").
    #[serde(rename = "Updated", default)]
    pub updated: String,
    /// Publish timestamp, used when `Updated` is absent.
    #[serde(rename = "Published", default)]
    pub published: String,
}

impl RawRecord {
    /// The link for this record, falling back to the record id.
    pub fn link_or_id(&self) -> &str {
        if self.link.is_empty() {
            &self.id
        } else {
            &self.link
        }
    }

    /// The timestamp string for this record: `Updated`, else `Published`.
    pub fn timestamp_str(&self) -> &str {
        if self.updated.is_empty() {
            &self.published
        } else {
            &self.updated
        }
    }
}

/// A specific region within a country carrying its own elevated risk.
///
/// Only levels 3 and 4 are modeled; sub-region warnings below the country's
/// tier are not extracted. Built exclusively by the regional extractor and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionalWarning {
    pub region_name: String,
    pub level: u8,
    pub reasons: String,
}

/// One country or territory's current advisory state.
#[derive(Debug, Clone, Serialize)]
pub struct TravelAdvisory {
    pub country_name: String,
    /// Two uppercase letters, or empty when the API carries no code.
    pub country_code: String,
    /// 1-4, or 0 for a retained compound entry with no level in its title.
    pub overall_level: u8,
    /// Cleaned plain-text summary.
    pub summary: String,
    pub last_updated: DateTime<Utc>,
    pub link: String,
    pub regional_warnings: Vec<RegionalWarning>,
}

impl TravelAdvisory {
    /// True if any region carries a higher risk level than the country overall.
    pub fn has_regional_elevation(&self) -> bool {
        self.regional_warnings
            .iter()
            .any(|w| w.level > self.overall_level)
    }

    /// Highest risk level among regional warnings, or the overall level when
    /// there are none.
    pub fn max_regional_level(&self) -> u8 {
        self.regional_warnings
            .iter()
            .map(|w| w.level)
            .max()
            .unwrap_or(self.overall_level)
    }

    /// Dedup identity: uppercased country code when present, else the
    /// lowercased trimmed name. Two records sharing a key are the same
    /// real-world country regardless of textual variation.
    pub fn identity_key(&self) -> String {
        if self.country_code.is_empty() {
            self.country_name.trim().to_lowercase()
        } else {
            self.country_code.to_uppercase()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advisory(code: &str, name: &str, level: u8, warnings: Vec<RegionalWarning>) -> TravelAdvisory {
        TravelAdvisory {
            country_name: name.to_string(),
            country_code: code.to_string(),
            overall_level: level,
            summary: String::new(),
            last_updated: Utc::now(),
            link: String::new(),
            regional_warnings: warnings,
        }
    }

    #[test]
    fn test_identity_key_prefers_code() {
        let adv = advisory("mx", "Mexico", 2, vec![]);
        assert_eq!(adv.identity_key(), "MX");
    }

    #[test]
    fn test_identity_key_falls_back_to_name() {
        let adv = advisory("", "  Mexico ", 2, vec![]);
        assert_eq!(adv.identity_key(), "mexico");
    }

    #[test]
    fn test_regional_elevation() {
        let warning = RegionalWarning {
            region_name: "Sinai Peninsula".to_string(),
            level: 4,
            reasons: "terrorism".to_string(),
        };
        let adv = advisory("EG", "Egypt", 3, vec![warning]);
        assert!(adv.has_regional_elevation());
        assert_eq!(adv.max_regional_level(), 4);

        let flat = advisory("EG", "Egypt", 3, vec![]);
        assert!(!flat.has_regional_elevation());
        assert_eq!(flat.max_regional_level(), 3);
    }

    #[test]
    fn test_raw_record_fallbacks() {
        let raw = RawRecord {
            id: "abc-123".to_string(),
            published: "2024-01-01T00:00:00Z".to_string(),
            ..RawRecord::default()
        };
        assert_eq!(raw.link_or_id(), "abc-123");
        assert_eq!(raw.timestamp_str(), "2024-01-01T00:00:00Z");
    }
}
