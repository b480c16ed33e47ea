/// Subject table: maps camelCase subject names to catalog subject tokens
use crate::dom::{Child, Document, Node};
use crate::error::{ScrapeError, StoreError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Subject `<option>` elements on the timetable search page.
pub const SUBJECT_OPTION_QUERY: &str = "#inputSubject > option";

/// Immutable lookup from subject key (e.g. `"calculus"`) to catalog token
/// (e.g. `"CALCULUS"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectCodes {
    codes: BTreeMap<String, String>,
}

impl SubjectCodes {
    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            codes: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Loads a subject table written as a JSON object.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON file, e.g. `resources/timetableSubjectMapping.json`
    ///
    /// # Returns
    /// * `Ok(SubjectCodes)` - Loaded table
    /// * `Err` - If the file can't be read or parsed
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))
    }

    /// Writes the table as a JSON object.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }
        let content = serde_json::to_string(self).map_err(|e| StoreError::json(path, e))?;
        fs::write(path, content).map_err(|e| StoreError::io(path, e))
    }

    /// Builds the table from the `#inputSubject` options of the timetable
    /// search page. Options with an empty `value` (the placeholder) are skipped.
    pub fn from_index_page<D: Document>(document: &D) -> Result<Self, ScrapeError> {
        let mut codes = BTreeMap::new();

        for option in document.select(SUBJECT_OPTION_QUERY)? {
            let value = match option.attr("value") {
                Some(value) if !value.is_empty() => value,
                _ => continue,
            };

            let name = match option.children().into_iter().next() {
                Some(Child::Text(text)) => text,
                Some(_) => {
                    return Err(ScrapeError::MalformedSubjectOption {
                        reason: format!("first child of option \"{value}\" is not text"),
                    })
                }
                None => {
                    return Err(ScrapeError::MalformedSubjectOption {
                        reason: format!("option \"{value}\" has no children"),
                    })
                }
            };

            codes.insert(to_camel_case(&name)?, first_word(&value)?);
        }

        Ok(Self { codes })
    }

    /// Looks up the catalog token for a subject key.
    pub fn get(&self, subject: &str) -> Result<&str, ScrapeError> {
        self.codes
            .get(subject)
            .map(String::as_str)
            .ok_or_else(|| ScrapeError::InvalidSubject {
                subject: subject.to_string(),
            })
    }

    /// Looks up a subject by its human-readable name, e.g. `"Computer Science"`.
    pub fn get_from_name(&self, name: &str) -> Result<&str, ScrapeError> {
        self.get(&to_camel_case(name)?)
    }

    /// All subject keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.codes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Turns a subject name into a camelCase key.
///
/// ```
/// use calendar_scraper::subjects::to_camel_case;
/// assert_eq!(to_camel_case("Computer Science").unwrap(), "computerScience");
/// ```
pub fn to_camel_case(name: &str) -> Result<String, ScrapeError> {
    let mut words = WORD_REGEX.find_iter(name).map(|m| m.as_str());
    let first = words.next().ok_or_else(|| ScrapeError::NoWords {
        text: name.to_string(),
    })?;

    let mut key = first.to_lowercase();
    for word in words {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            key.extend(c.to_uppercase());
            key.push_str(chars.as_str());
        }
    }
    Ok(key)
}

/// Returns the first run of word characters in `text`.
pub fn first_word(text: &str) -> Result<String, ScrapeError> {
    WORD_REGEX
        .find(text)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ScrapeError::NoWords {
            text: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;
    use tempfile::TempDir;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("Calculus").unwrap(), "calculus");
        assert_eq!(
            to_camel_case("Mechatronic Systems Engineering").unwrap(),
            "mechatronicSystemsEngineering"
        );
        assert_eq!(
            to_camel_case("Arts & Humanities").unwrap(),
            "artsHumanities"
        );
        assert_eq!(to_camel_case("BUSINESS ADMIN").unwrap(), "businessADMIN");
        assert!(matches!(
            to_camel_case(" & ").unwrap_err(),
            ScrapeError::NoWords { .. }
        ));
    }

    #[test]
    fn test_first_word() {
        assert_eq!(first_word("CALCULUS ").unwrap(), "CALCULUS");
        assert_eq!(first_word("  MATH 1").unwrap(), "MATH");
        assert!(first_word("").is_err());
    }

    #[test]
    fn test_lookup() {
        let codes = SubjectCodes::from_map([("calculus", "CALCULUS"), ("computerScience", "COMPSCI")]);
        assert_eq!(codes.get("calculus").unwrap(), "CALCULUS");
        assert_eq!(codes.get_from_name("Computer Science").unwrap(), "COMPSCI");
        assert_eq!(
            codes.get("astrology").unwrap_err(),
            ScrapeError::InvalidSubject {
                subject: "astrology".to_string()
            }
        );
        assert_eq!(codes.keys().collect::<Vec<_>>(), vec!["calculus", "computerScience"]);
    }

    #[test]
    fn test_from_index_page() {
        let page = r#"<html><body><select id="inputSubject">
            <option value="">All Subjects</option>
            <option value="CALCULUS ">Calculus</option>
            <option value="COMPSCI">Computer Science</option>
        </select></body></html>"#;
        let codes = SubjectCodes::from_index_page(&HtmlDocument::parse(page)).unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes.get("calculus").unwrap(), "CALCULUS");
        assert_eq!(codes.get("computerScience").unwrap(), "COMPSCI");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resources").join("subjects.json");
        let codes = SubjectCodes::from_map([("calculus", "CALCULUS")]);
        codes.save(&path).unwrap();

        let loaded = SubjectCodes::load(&path).unwrap();
        assert_eq!(loaded, codes);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"calculus":"CALCULUS"}"#
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = SubjectCodes::load(Path::new("/nonexistent/subjects.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
