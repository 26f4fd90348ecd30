//! Prohibited-country policy tables and the membership predicate.
//!
//! Per 15 CFR 791.4 the US Department of Commerce designates six countries as
//! foreign adversaries; Texas Executive Order GA-48 prohibits state employees
//! from work-related travel to them. The tables here are configuration data,
//! injectable so tests can substitute alternate policy sets.

/// One policy-designated country.
#[derive(Debug, Clone)]
pub struct ProhibitedCountry {
    /// Short name used in reports, e.g. "China".
    pub name: String,
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    /// Territories covered by the designation, e.g. Hong Kong under China.
    pub includes: Vec<String>,
    /// Official long-form name.
    pub official_name: String,
}

/// Injectable policy configuration: the prohibited table plus the lowercase
/// name/alias set driving the membership predicate.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub prohibited: Vec<ProhibitedCountry>,
    /// Exact lowercase forms and known aliases matched against country names.
    pub prohibited_names: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        fn country(name: &str, code: &str, includes: &[&str], official: &str) -> ProhibitedCountry {
            ProhibitedCountry {
                name: name.to_string(),
                code: code.to_string(),
                includes: includes.iter().map(|s| s.to_string()).collect(),
                official_name: official.to_string(),
            }
        }

        Self {
            prohibited: vec![
                country("China", "CN", &["Hong Kong", "Macau"], "People's Republic of China"),
                country("Cuba", "CU", &[], "Republic of Cuba"),
                country("Iran", "IR", &[], "Islamic Republic of Iran"),
                country("North Korea", "KP", &[], "Democratic People's Republic of Korea"),
                country("Russia", "RU", &[], "Russian Federation"),
                country(
                    "Venezuela",
                    "VE",
                    &[],
                    "Bolivarian Republic of Venezuela (Maduro Regime)",
                ),
            ],
            prohibited_names: [
                "china",
                "hong kong",
                "macau",
                "macao",
                "cuba",
                "iran",
                "north korea",
                "korea, north",
                "democratic people's republic of korea",
                "russia",
                "russian federation",
                "venezuela",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl PolicyConfig {
    /// Check whether a country name is on the prohibited list.
    ///
    /// Exact match first, then substring matching to catch compound headings
    /// such as "Mainland China, Hong Kong & Macau - See Summaries".
    pub fn is_prohibited(&self, country_name: &str) -> bool {
        let name = country_name.trim().to_lowercase();
        if self.prohibited_names.iter().any(|p| p == &name) {
            return true;
        }
        self.prohibited_names.iter().any(|p| name.contains(p.as_str()))
    }
}

/// Official display name for an advisory level; empty for the level-0 sentinel.
pub fn level_name(level: u8) -> &'static str {
    match level {
        1 => "Exercise Normal Precautions",
        2 => "Exercise Increased Caution",
        3 => "Reconsider Travel",
        4 => "Do Not Travel",
        _ => "",
    }
}
