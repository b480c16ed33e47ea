/// Configuration for the calendar and timetable scraper
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base URL of the academic calendar; course links are resolved against it.
pub const CALENDAR_BASE_URL: &str = "https://www.westerncalendar.uwo.ca/";

/// Master timetable search page (GET for the index, POST for a subject).
pub const TIMETABLE_URL: &str =
    "https://studentservices.uwo.ca/secure/timetables/mastertt/ttindex.cfm";

/// Top-level scraper configuration.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub calendar_base_url: String,
    pub timetable_url: String,
    /// Minimum time between two requests, in milliseconds
    pub request_delay_ms: u64,
    /// Extra random delay added to each pause, in milliseconds
    pub request_jitter_ms: u64,
    /// Pause between two subjects, in milliseconds
    pub subject_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Root of the `course_info/` and `course_offering/` output directories
    pub output_dir: PathBuf,
    pub subject_table_path: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            calendar_base_url: CALENDAR_BASE_URL.to_string(),
            timetable_url: TIMETABLE_URL.to_string(),
            request_delay_ms: 2_000,
            request_jitter_ms: 250,
            subject_delay_ms: 1_000,
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            output_dir: PathBuf::from("data"),
            subject_table_path: PathBuf::from("resources").join("timetableSubjectMapping.json"),
        }
    }
}

impl ScraperConfig {
    /// Loads a configuration file
    ///
    /// # Arguments
    /// * `path` - Path to a JSON config file
    ///
    /// # Returns
    /// * `Ok(ScraperConfig)` - Defaults overlaid with the file's values
    /// * `Err` - If the file can't be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn subject_delay(&self) -> Duration {
        Duration::from_millis(self.subject_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Calendar listing page for one subject token.
    pub fn subject_calendar_url(&self, subject_token: &str) -> String {
        format!(
            "{}Courses.cfm?Subject={}&SelectedCalendar=Live&ArchiveID=",
            self.calendar_base_url, subject_token
        )
    }

    /// Form body of the timetable search for one subject token, all days and
    /// all components.
    pub fn timetable_form_body(subject_token: &str) -> String {
        format!(
            "subject={subject_token}&Designation=Any&catalognbr=&CourseTime=All&Component=All\
             &time=&end_time=&day=m&day=tu&day=w&day=th&day=f&LocationCode=Any&command=search"
        )
    }
}
