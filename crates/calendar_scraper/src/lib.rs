//! Course catalog extraction for Western University's academic calendar and
//! master timetable.
//!
//! The [`extract`] functions turn parsed pages into [`CourseRecord`] and
//! [`OfferingRecord`] values. The [`runner`] drives them over a subject table
//! with a [`PageFetcher`] and a [`RecordSink`].

pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod runner;
pub mod sink;
pub mod subjects;
pub mod types;
pub mod weekday;

pub use config::ScraperConfig;
pub use error::{DocumentError, ErrorCategory, FetchError, RunError, ScrapeError, StoreError};
pub use fetch::{HttpFetcher, PageFetcher};
pub use runner::{RunSummary, Scraper};
pub use sink::{JsonFileSink, RecordKind, RecordSink};
pub use subjects::SubjectCodes;
pub use types::{Breadth, CourseRecord, MeetingRow, OfferingRecord};
pub use weekday::{Weekday, WeekdaySet};
