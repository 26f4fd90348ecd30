//! Collapse advisories sharing an identity key, keeping the freshest entry.

use crate::model::TravelAdvisory;
use std::collections::HashMap;

/// Deduplicate advisories in arrival order.
///
/// The identity key is the advisory's country code when present, else its
/// normalized name (see `TravelAdvisory::identity_key`). On a repeat key the
/// record with the later `last_updated` wins; at equal timestamps the
/// incoming record wins. Output preserves the insertion order of first-seen
/// keys, alongside human-readable descriptions of every dropped pair.
pub fn deduplicate(advisories: Vec<TravelAdvisory>) -> (Vec<TravelAdvisory>, Vec<String>) {
    let mut kept: Vec<TravelAdvisory> = Vec::with_capacity(advisories.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut duplicates: Vec<String> = Vec::new();

    for adv in advisories {
        let key = adv.identity_key();
        match index.get(&key) {
            Some(&slot) => {
                let existing = &kept[slot];
                if adv.last_updated >= existing.last_updated {
                    duplicates.push(describe_drop(existing, &adv));
                    kept[slot] = adv;
                } else {
                    duplicates.push(describe_drop(&adv, existing));
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(adv);
            }
        }
    }

    (kept, duplicates)
}

fn describe_drop(dropped: &TravelAdvisory, winner: &TravelAdvisory) -> String {
    format!(
        "Dropped '{}' (code={}, updated={}) in favor of '{}' (updated={})",
        dropped.country_name,
        dropped.country_code,
        dropped.last_updated.format("%Y-%m-%d"),
        winner.country_name,
        winner.last_updated.format("%Y-%m-%d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn advisory(code: &str, name: &str, day: u32) -> TravelAdvisory {
        TravelAdvisory {
            country_name: name.to_string(),
            country_code: code.to_string(),
            overall_level: 2,
            summary: String::new(),
            last_updated: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            link: String::new(),
            regional_warnings: vec![],
        }
    }

    #[test]
    fn test_later_update_wins() {
        let (kept, dups) = deduplicate(vec![
            advisory("MX", "Mexico", 10),
            advisory("MX", "Mexico (new)", 20),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].country_name, "Mexico (new)");
        assert_eq!(dups.len(), 1);
        assert!(dups[0].starts_with("Dropped 'Mexico'"));
    }

    #[test]
    fn test_earlier_update_dropped() {
        let (kept, dups) = deduplicate(vec![
            advisory("MX", "Mexico", 20),
            advisory("MX", "Mexico (stale)", 10),
        ]);
        assert_eq!(kept[0].country_name, "Mexico");
        assert!(dups[0].starts_with("Dropped 'Mexico (stale)'"));
    }

    #[test]
    fn test_equal_timestamps_incoming_wins() {
        let (kept, _) = deduplicate(vec![
            advisory("MX", "Mexico (first)", 10),
            advisory("MX", "Mexico (second)", 10),
        ]);
        assert_eq!(kept[0].country_name, "Mexico (second)");
    }

    #[test]
    fn test_name_key_when_code_missing() {
        let (kept, dups) = deduplicate(vec![
            advisory("", "Kosovo", 10),
            advisory("", "  kosovo ", 20),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(dups.len(), 1);
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let (kept, _) = deduplicate(vec![
            advisory("AA", "Alpha", 10),
            advisory("BB", "Bravo", 10),
            advisory("AA", "Alpha (new)", 20),
            advisory("CC", "Charlie", 10),
        ]);
        let names: Vec<_> = kept.iter().map(|a| a.country_name.as_str()).collect();
        assert_eq!(names, ["Alpha (new)", "Bravo", "Charlie"]);
    }

    #[test]
    fn test_distinct_keys_untouched() {
        let (kept, dups) = deduplicate(vec![advisory("MX", "Mexico", 10), advisory("CA", "Canada", 10)]);
        assert_eq!(kept.len(), 2);
        assert!(dups.is_empty());
    }
}
