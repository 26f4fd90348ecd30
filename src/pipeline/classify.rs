//! Partition advisories into prohibited and high-risk sets, fully ordered.

use crate::model::TravelAdvisory;
use crate::policy::PolicyConfig;
use serde::Serialize;

/// Statistics consumed by the renderer and the `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct RiskStats {
    /// Prohibited countries matched in the data.
    pub prohibited: usize,
    /// Prohibited plus high-risk entries.
    pub total: usize,
    /// High-risk entries at overall level 4.
    pub level_4: usize,
    /// High-risk entries at overall level 3.
    pub level_3: usize,
    /// Entries below level 3 carrying a qualifying regional elevation.
    pub regional: usize,
}

/// Outcome of risk classification: two disjoint, fully ordered sequences.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Prohibited countries, ascending by name.
    pub prohibited: Vec<TravelAdvisory>,
    /// High-risk countries: level desc, max regional level desc, name asc.
    pub high_risk: Vec<TravelAdvisory>,
    pub stats: RiskStats,
}

/// Classify deduplicated advisories.
///
/// Prohibited membership is tested first and wins outright, regardless of
/// level. Otherwise an advisory is high-risk when its overall level is >= 3,
/// or when a regional warning exceeds its overall level and the maximum
/// regional level is >= 3. Everything else is dropped from both outputs —
/// a level-1/2 country with no qualifying escalation is not reported.
pub fn classify(advisories: Vec<TravelAdvisory>, policy: &PolicyConfig) -> Classification {
    let mut prohibited = Vec::new();
    let mut high_risk = Vec::new();

    for adv in advisories {
        if policy.is_prohibited(&adv.country_name) {
            prohibited.push(adv);
            continue;
        }
        if adv.overall_level >= 3 {
            high_risk.push(adv);
            continue;
        }
        if adv.has_regional_elevation() && adv.max_regional_level() >= 3 {
            high_risk.push(adv);
        }
    }

    prohibited.sort_by(|a, b| a.country_name.cmp(&b.country_name));
    high_risk.sort_by(|a, b| {
        b.overall_level
            .cmp(&a.overall_level)
            .then(b.max_regional_level().cmp(&a.max_regional_level()))
            .then(a.country_name.cmp(&b.country_name))
    });

    let stats = RiskStats {
        prohibited: prohibited.len(),
        total: prohibited.len() + high_risk.len(),
        level_4: high_risk.iter().filter(|a| a.overall_level == 4).count(),
        level_3: high_risk.iter().filter(|a| a.overall_level == 3).count(),
        regional: high_risk
            .iter()
            .filter(|a| a.overall_level < 3 && a.has_regional_elevation())
            .count(),
    };

    Classification {
        prohibited,
        high_risk,
        stats,
    }
}
