/// Types for scraped course calendar and timetable data
use crate::weekday::WeekdaySet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Breadth (distribution requirement) category of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breadth {
    A,
    B,
    C,
}

impl Breadth {
    /// Case-insensitive lookup of a single category letter
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter.to_ascii_uppercase().as_str() {
            "A" => Some(Breadth::A),
            "B" => Some(Breadth::B),
            "C" => Some(Breadth::C),
            _ => None,
        }
    }
}

impl fmt::Display for Breadth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Breadth::A => "A",
            Breadth::B => "B",
            Breadth::C => "C",
        };
        f.write_str(letter)
    }
}

/// A course from its academic calendar information page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    /// Source URL of the information page
    pub link: String,
    pub name: String,              // e.g., "Calculus I"
    pub course_code: String,       // e.g., "CALCULUS 1000"
    pub subject_code: String,      // e.g., "CALCULUS"
    pub course_number: String,     // e.g., "1000"
    pub description: String,

    /// Course weight; `NaN` when the page text is not a number
    pub weight: f64,

    pub breadth: Option<Breadth>,
    pub extra_information: Option<String>,
    pub prerequisites: Option<String>,
    pub corequisites: Option<String>,
    pub pre_or_corequisites: Option<String>,

    /// Campus locations; the first is the location of `link` itself
    pub locations: Vec<String>,    // e.g., ["MAIN", "KINGS"]

    pub valid_suffixes: Vec<String>, // e.g., ["A", "B"]

    /// Extracted but not part of the exported record
    #[serde(skip)]
    pub antirequisites: Option<String>,
}

/// A scheduled offering of a course from the master timetable
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingRecord {
    pub subject_code: String,
    pub course_number: String,
    pub suffixes: String,          // e.g., "AB", may be empty
    pub course_code: String,
    pub description: String,
    pub meetings: Vec<MeetingRow>,
}

/// One row of an offering's schedule table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRow {
    pub section_number: String,    // e.g., "001"
    pub component_type: String,    // e.g., "LEC"
    pub class_number: String,
    pub weekday_mask: WeekdaySet,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub instructor_name: String,
    pub requisites_and_constraints: String,
    pub fill_status: String,       // e.g., "Not Full"
    pub campus: String,
}

/// Builds a course code from its parts
pub fn course_code(subject_code: &str, course_number: &str) -> String {
    format!("{} {}", subject_code, course_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadth_from_letter() {
        assert_eq!(Breadth::from_letter("b"), Some(Breadth::B));
        assert_eq!(Breadth::from_letter("C"), Some(Breadth::C));
        assert_eq!(Breadth::from_letter("D"), None);
    }

    #[test]
    fn test_course_record_json_shape() {
        let record = CourseRecord {
            link: "https://example.org".to_string(),
            name: "Calculus I".to_string(),
            course_code: course_code("CALCULUS", "1000"),
            subject_code: "CALCULUS".to_string(),
            course_number: "1000".to_string(),
            description: "Limits.".to_string(),
            weight: 0.5,
            breadth: Some(Breadth::C),
            extra_information: None,
            prerequisites: Some("High school math.".to_string()),
            corequisites: None,
            pre_or_corequisites: None,
            locations: vec!["MAIN".to_string()],
            valid_suffixes: vec!["A".to_string(), "B".to_string()],
            antirequisites: Some("Calculus 1500A/B".to_string()),
        };

        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 14);
        assert_eq!(value["courseCode"], "CALCULUS 1000");
        assert_eq!(value["breadth"], "C");
        assert_eq!(value["extraInformation"], serde_json::Value::Null);
        assert_eq!(value["preOrCorequisites"], serde_json::Value::Null);
        assert!(!obj.contains_key("antirequisites"));
    }

    #[test]
    fn test_nan_weight_serializes_as_null() {
        let value = serde_json::to_value(f64::NAN).unwrap();
        assert!(value.is_null());
    }
}
