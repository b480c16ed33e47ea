//! Error types for catalog extraction and its collaborators.

use thiserror::Error;

/// Errors raised while extracting structured data from catalog markup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScrapeError {
    /// More weekday tokens than there are weekdays
    #[error("Weekday list has {count} items (more than weekdays in a week)")]
    TooManyWeekdays { count: usize },

    /// A weekday mask outside of the 5-bit range
    #[error("Weekday mask {value} is out of range (0..=31)")]
    WeekdayMaskOutOfRange { value: u32 },

    /// A day token that is not one of M, Tu, W, Th, F
    #[error("Unknown weekday token: \"{token}\"")]
    UnknownWeekdayToken { token: String },

    /// The heading did not start with `<letters> <digits>`
    #[error("Heading does not match the course code pattern: \"{heading}\"")]
    HeaderPatternMismatch { heading: String },

    /// A breadth node exists but does not read `Category X`
    #[error("Category text does not match the pattern Category X: \"{text}\"")]
    UnrecognizedBreadthCategory { text: String },

    /// The course link carries no campus location
    #[error("Location pattern does not match the course calendar link: {link}")]
    LocationUnresolvable { link: String },

    /// Text that was expected to contain at least one word
    #[error("Found no words in the provided string: \"{text}\"")]
    NoWords { text: String },

    /// Small-label node does not have the expected child layout
    #[error("Malformed small label: {reason}")]
    MalformedLabelStructure { reason: String },

    /// Schedule row has fewer cells than the fixed column order requires
    #[error("Schedule row has {found} cells, expected {expected}")]
    MalformedScheduleRow { expected: usize, found: usize },

    /// Subject `<option>` on the timetable index page is malformed
    #[error("Malformed subject option: {reason}")]
    MalformedSubjectOption { reason: String },

    /// A node the record cannot be built without is absent
    #[error("Required node is missing from the page")]
    MissingField,

    /// Sibling scan ran off the end without finding a table
    #[error("Could not find the course offering schedule table for \"{heading}\"")]
    ScheduleTableNotFound { heading: String },

    /// Subject key is not in the subject table
    #[error("Invalid subject: \"{subject}\"")]
    InvalidSubject { subject: String },

    /// A structural query could not be parsed by the DOM backend
    #[error("Invalid structural query `{query}`: {message}")]
    InvalidQuery { query: String, message: String },
}

/// Coarse classification of a [`ScrapeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Range,
    PatternMismatch,
    MalformedStructure,
    InvalidSubject,
    ScheduleTableNotFound,
}

impl ScrapeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScrapeError::TooManyWeekdays { .. } | ScrapeError::WeekdayMaskOutOfRange { .. } => {
                ErrorCategory::Range
            }
            ScrapeError::UnknownWeekdayToken { .. }
            | ScrapeError::HeaderPatternMismatch { .. }
            | ScrapeError::UnrecognizedBreadthCategory { .. }
            | ScrapeError::LocationUnresolvable { .. }
            | ScrapeError::NoWords { .. } => ErrorCategory::PatternMismatch,
            ScrapeError::MalformedLabelStructure { .. }
            | ScrapeError::MalformedScheduleRow { .. }
            | ScrapeError::MalformedSubjectOption { .. }
            | ScrapeError::MissingField
            | ScrapeError::InvalidQuery { .. } => ErrorCategory::MalformedStructure,
            ScrapeError::InvalidSubject { .. } => ErrorCategory::InvalidSubject,
            ScrapeError::ScheduleTableNotFound { .. } => ErrorCategory::ScheduleTableNotFound,
        }
    }

    /// Returns true if this error means the catalog markup changed shape and
    /// the selectors or patterns need review.
    pub fn is_layout_drift(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::PatternMismatch
                | ErrorCategory::MalformedStructure
                | ErrorCategory::ScheduleTableNotFound
        )
    }
}

/// A [`ScrapeError`] tied to the document and field it came from.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{document}: failed to extract `{field}`: {source}")]
pub struct DocumentError {
    /// Source URL of a course page, or subject token of a timetable page
    pub document: String,
    pub field: &'static str,
    pub source: ScrapeError,
}

impl DocumentError {
    pub fn category(&self) -> ErrorCategory {
        self.source.category()
    }
}

pub(crate) trait FieldContext<T> {
    fn in_field(self, document: &str, field: &'static str) -> Result<T, DocumentError>;
}

impl<T> FieldContext<T> for Result<T, ScrapeError> {
    fn in_field(self, document: &str, field: &'static str) -> Result<T, DocumentError> {
        self.map_err(|source| DocumentError {
            document: document.to_string(),
            field,
            source,
        })
    }
}

/// Errors from the page fetcher.
#[derive(Debug, Error, Clone)]
pub enum FetchError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    UrlError { message: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::UrlError {
            message: err.to_string(),
        }
    }
}

/// Errors from the record sink and from loading configuration files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Errors that abort a scraping run.
///
/// Failures of a single page are logged and skipped by the runner; only
/// these stop it.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            ScrapeError::TooManyWeekdays { count: 6 }.category(),
            ErrorCategory::Range
        );
        assert_eq!(
            ScrapeError::HeaderPatternMismatch {
                heading: "Calculus".to_string()
            }
            .category(),
            ErrorCategory::PatternMismatch
        );
        assert_eq!(
            ScrapeError::InvalidSubject {
                subject: "x".to_string()
            }
            .category(),
            ErrorCategory::InvalidSubject
        );
        assert!(!ScrapeError::InvalidSubject {
            subject: "x".to_string()
        }
        .is_layout_drift());
        assert!(ScrapeError::MissingField.is_layout_drift());
    }

    #[test]
    fn test_document_error_context() {
        let result: Result<(), ScrapeError> = Err(ScrapeError::MissingField);
        let err = result
            .in_field("https://example.org/c", "subjectCode")
            .unwrap_err();
        assert_eq!(err.document, "https://example.org/c");
        assert_eq!(err.field, "subjectCode");
        assert_eq!(err.category(), ErrorCategory::MalformedStructure);
        assert!(err.to_string().contains("`subjectCode`"));
    }
}
