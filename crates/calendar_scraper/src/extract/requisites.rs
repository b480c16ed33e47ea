//! Splitting of the combined requisite block on course pages.
//!
//! The block holds up to three labelled clauses in no particular order:
//!
//! ```text
//! Prerequisite(s): Calculus 1000A/B. Corequisite(s): Calculus 1301A/B.
//! ```

use regex::Regex;
use std::sync::LazyLock;

// Leftmost-first alternation: at the start of "Pre-or Corequisite(s):" the
// long label wins, so the "Corequisite(s):" inside it never matches on its own.
static LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Pre-or\s+Corequisite\(s\):|Prerequisite\(s\):|Corequisite\(s\):").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Prerequisite,
    Corequisite,
    PreOrCorequisite,
}

impl Label {
    fn from_match(text: &str) -> Self {
        if text.starts_with("Pre-or") {
            Label::PreOrCorequisite
        } else if text.starts_with("Prerequisite") {
            Label::Prerequisite
        } else {
            Label::Corequisite
        }
    }
}

/// The three requisite clauses of a course, each independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requisites {
    pub prerequisites: Option<String>,
    pub corequisites: Option<String>,
    pub pre_or_corequisites: Option<String>,
}

/// Splits a requisite block into its clauses.
///
/// Each clause runs from its label to the next label of any kind, or to the
/// end of the text. Only the first occurrence of each label is used. Text with
/// no labels, and absent text, yield all fields `None`.
pub fn split_requisites(text: Option<&str>) -> Requisites {
    let mut requisites = Requisites::default();
    let Some(text) = text else {
        return requisites;
    };

    let labels: Vec<_> = LABEL_REGEX.find_iter(text).collect();
    for (i, label) in labels.iter().enumerate() {
        let end = labels.get(i + 1).map_or(text.len(), |next| next.start());
        let clause = text[label.end()..end].trim();

        let slot = match Label::from_match(label.as_str()) {
            Label::Prerequisite => &mut requisites.prerequisites,
            Label::Corequisite => &mut requisites.corequisites,
            Label::PreOrCorequisite => &mut requisites.pre_or_corequisites,
        };
        if slot.is_none() && !clause.is_empty() {
            *slot = Some(clause.to_string());
        }
    }

    requisites
}

/// Removes line breaks the way the calendar wraps long requisite lists.
pub fn strip_line_breaks(text: &str) -> String {
    text.replace(['\r', '\n'], "")
}
