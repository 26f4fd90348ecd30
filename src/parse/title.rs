//! Split an advisory heading into country name and overall level.

use regex::Regex;
use std::sync::LazyLock;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\s*-\s*Level\s*(\d)").unwrap());

/// Extract `(country_name, level)` from a heading of the conventional shape
/// `"<Country> - Level <N>: <description>"` (case-insensitive).
///
/// Headings with no level token — compound "see summaries" entries — return
/// the original string and level 0. Level 0 is a valid sentinel, not an
/// error; the record parser decides whether such entries are retained.
pub fn parse_title(title: &str) -> (String, u8) {
    if let Some(caps) = TITLE_RE.captures(title) {
        let name = caps[1].trim().to_string();
        let level = caps[2].parse().unwrap_or(0);
        return (name, level);
    }
    (title.to_string(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_heading() {
        let (name, level) = parse_title("Mexico - Level 2: Exercise Increased Caution");
        assert_eq!(name, "Mexico");
        assert_eq!(level, 2);
    }

    #[test]
    fn test_case_insensitive() {
        let (name, level) = parse_title("Somalia - LEVEL 4: Do Not Travel");
        assert_eq!(name, "Somalia");
        assert_eq!(level, 4);
    }

    #[test]
    fn test_loose_spacing() {
        let (name, level) = parse_title("Burkina Faso-Level 4: Do Not Travel");
        assert_eq!(name, "Burkina Faso");
        assert_eq!(level, 4);
    }

    #[test]
    fn test_compound_heading_yields_sentinel() {
        let title = "Mainland China, Hong Kong & Macau - See Summaries";
        let (name, level) = parse_title(title);
        assert_eq!(name, title);
        assert_eq!(level, 0);
    }

    #[test]
    fn test_hyphenated_country_name() {
        let (name, level) = parse_title("Guinea-Bissau - Level 3: Reconsider Travel");
        assert_eq!(name, "Guinea-Bissau");
        assert_eq!(level, 3);
    }
}
