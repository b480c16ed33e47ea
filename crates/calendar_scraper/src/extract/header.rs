//! Course heading parsing (`"CALC 1000A/B - Calculus I"`).

use crate::error::ScrapeError;
use regex::Regex;
use std::sync::LazyLock;

// Letters, whitespace, digits, then a suffix block of capitals each optionally
// followed by a slash. Whatever follows the suffix block is ignored.
static HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<subject>[A-Za-z]+)\s+(?P<number>\d+)(?P<suffixes>(?:[A-Z]/?)*)").unwrap()
});

/// The code portion of a course heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseHeading {
    /// Leading word, e.g. `"CALC"` or `"Calculus"`
    pub subject: String,
    pub course_number: String,
    /// Distinct suffix letters in first-seen order
    pub suffixes: Vec<char>,
}

impl CourseHeading {
    /// Suffix letters joined without separators, e.g. `"AB"`.
    pub fn suffix_string(&self) -> String {
        self.suffixes.iter().collect()
    }

    pub fn suffix_strings(&self) -> Vec<String> {
        self.suffixes.iter().map(char::to_string).collect()
    }
}

/// Parses a heading of the shape `<letters> <digits><suffixes>`.
pub fn parse_heading(heading: &str) -> Result<CourseHeading, ScrapeError> {
    let caps = HEADING_REGEX
        .captures(heading)
        .ok_or_else(|| ScrapeError::HeaderPatternMismatch {
            heading: heading.to_string(),
        })?;

    let subject = caps["subject"].to_string();
    let course_number = caps["number"].to_string();
    let suffixes = parse_suffixes(caps.name("suffixes").map_or("", |m| m.as_str()));

    Ok(CourseHeading {
        subject,
        course_number,
        suffixes,
    })
}

/// Extracts the distinct capital letters of a suffix block, ignoring slashes.
pub fn parse_suffixes(block: &str) -> Vec<char> {
    let mut suffixes = Vec::new();
    for c in block.chars().filter(char::is_ascii_uppercase) {
        if !suffixes.contains(&c) {
            suffixes.push(c);
        }
    }
    suffixes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_joined_suffixes() {
        let h = parse_heading("CALC 1000A/B").unwrap();
        assert_eq!(h.subject, "CALC");
        assert_eq!(h.course_number, "1000");
        assert_eq!(h.suffix_strings(), vec!["A", "B"]);
        assert_eq!(h.suffix_string(), "AB");
    }

    #[test]
    fn test_no_suffixes() {
        let h = parse_heading("MATH 1225").unwrap();
        assert_eq!(h.course_number, "1225");
        assert!(h.suffixes.is_empty());
    }

    #[test]
    fn test_trailing_description_ignored() {
        let h = parse_heading("Calculus 1000A/B - CALCULUS I").unwrap();
        assert_eq!(h.subject, "Calculus");
        assert_eq!(h.course_number, "1000");
        assert_eq!(h.suffixes, vec!['A', 'B']);

        let h = parse_heading("WRITING 2101F/G Essay Writing").unwrap();
        assert_eq!(h.suffixes, vec!['F', 'G']);
    }

    #[test]
    fn test_suffixes_deduplicated_in_order() {
        let h = parse_heading("ECE 3380E/A/E").unwrap();
        assert_eq!(h.suffixes, vec!['E', 'A']);
    }

    #[test]
    fn test_no_digits_fails() {
        let err = parse_heading("Introduction to Calculus").unwrap_err();
        assert_eq!(
            err,
            ScrapeError::HeaderPatternMismatch {
                heading: "Introduction to Calculus".to_string()
            }
        );
        assert!(parse_heading("").is_err());
    }
}
