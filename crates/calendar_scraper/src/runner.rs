//! Scraping runs: fetch pages, extract records, write them out.
//!
//! A run walks one subject or every subject of the table, in order. Pages are
//! fetched one at a time through the [`PageFetcher`]; a page that cannot be
//! fetched counts as absent and a page that cannot be extracted counts as
//! skipped. Neither stops the run.

use crate::config::ScraperConfig;
use crate::dom::HtmlDocument;
use crate::error::{DocumentError, FetchError, RunError};
use crate::extract::{course_links, extract_course, extract_offering, offering_headings};
use crate::fetch::PageFetcher;
use crate::sink::{RecordKind, RecordSink};
use crate::subjects::SubjectCodes;
use crate::types::{CourseRecord, OfferingRecord};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{error, info, warn};
use url::Url;

/// Document counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Records written to the sink
    pub written: usize,
    /// Documents whose extraction failed
    pub skipped: usize,
    /// Documents that could not be fetched
    pub absent: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} skipped, {} absent",
            self.written, self.skipped, self.absent
        )
    }
}

/// Drives a fetcher and a sink over the subject table.
pub struct Scraper<F, S> {
    fetcher: F,
    sink: S,
    subjects: SubjectCodes,
    config: ScraperConfig,
    base_url: Url,
}

impl<F: PageFetcher, S: RecordSink> Scraper<F, S> {
    pub fn new(
        fetcher: F,
        sink: S,
        subjects: SubjectCodes,
        config: ScraperConfig,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.calendar_base_url)?;
        Ok(Self {
            fetcher,
            sink,
            subjects,
            config,
            base_url,
        })
    }

    /// Fetches and extracts every course of one subject.
    ///
    /// # Returns
    /// * `Ok(Some(records))` - Records of every course page that could be extracted
    /// * `Ok(None)` - The subject listing page could not be fetched
    /// * `Err` - Unknown subject key
    pub async fn course_info_for_subject(
        &self,
        subject: &str,
        summary: &mut RunSummary,
    ) -> Result<Option<Vec<CourseRecord>>, RunError> {
        let token = self.subjects.get(subject)?;
        let listing_url = self.config.subject_calendar_url(token);

        let listing = match self.fetcher.get(&listing_url).await {
            Ok(markup) => markup,
            Err(e) => {
                error!(subject = %subject, url = %listing_url, error = %e, "Failed to fetch subject listing");
                summary.absent += 1;
                return Ok(None);
            }
        };
        let links = course_links(&HtmlDocument::parse(&listing), &self.base_url)?;
        info!(subject = %subject, courses = links.len(), "Found course links");

        let mut records = Vec::with_capacity(links.len());
        for link in &links {
            let markup = match self.fetcher.get(link).await {
                Ok(markup) => markup,
                Err(e) => {
                    error!(link = %link, error = %e, "Failed to fetch course page");
                    summary.absent += 1;
                    continue;
                }
            };

            match extract_course(&HtmlDocument::parse(&markup), link) {
                Ok(record) => records.push(record),
                Err(e) => {
                    log_skipped(&e);
                    summary.skipped += 1;
                }
            }
        }

        Ok(Some(records))
    }

    /// Fetches the timetable page of one subject and extracts its offerings.
    ///
    /// Headings that cannot be extracted are skipped; the others are kept.
    pub async fn offerings_for_subject(
        &self,
        subject: &str,
        summary: &mut RunSummary,
    ) -> Result<Option<Vec<OfferingRecord>>, RunError> {
        let token = self.subjects.get(subject)?;
        let body = ScraperConfig::timetable_form_body(token);

        let markup = match self.fetcher.post_form(&self.config.timetable_url, &body).await {
            Ok(markup) => markup,
            Err(e) => {
                error!(subject = %subject, error = %e, "Failed to fetch timetable");
                summary.absent += 1;
                return Ok(None);
            }
        };

        Ok(Some(parse_timetable(&markup, token, summary)))
    }

    /// Writes course information records for one subject, or every subject
    /// when `subject` is `None`.
    pub async fn dump_course_info(&self, subject: Option<&str>) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();
        for (i, subject) in self.selected_subjects(subject)?.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.subject_delay()).await;
            }
            info!(subject = %subject, "Scraping course information");
            if let Some(records) = self.course_info_for_subject(subject, &mut summary).await? {
                self.sink.write(RecordKind::CourseInfo, subject, &records)?;
                summary.written += records.len();
            }
        }
        info!(%summary, "Course information run finished");
        Ok(summary)
    }

    /// Writes offering records for one subject, or every subject when
    /// `subject` is `None`.
    pub async fn dump_offerings(&self, subject: Option<&str>) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();
        for (i, subject) in self.selected_subjects(subject)?.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.subject_delay()).await;
            }
            info!(subject = %subject, "Scraping timetable");
            if let Some(records) = self.offerings_for_subject(subject, &mut summary).await? {
                self.sink.write(RecordKind::CourseOffering, subject, &records)?;
                summary.written += records.len();
            }
        }
        info!(%summary, "Timetable run finished");
        Ok(summary)
    }

    /// Rebuilds the subject table from the timetable index page and saves it.
    pub async fn generate_subject_table(&self, path: &Path) -> Result<SubjectCodes, RunError> {
        let markup = self.fetcher.get(&self.config.timetable_url).await?;
        let subjects = SubjectCodes::from_index_page(&HtmlDocument::parse(&markup))?;
        subjects.save(path)?;
        info!(path = %path.display(), subjects = subjects.len(), "Wrote subject table");
        Ok(subjects)
    }

    fn selected_subjects(&self, subject: Option<&str>) -> Result<Vec<String>, RunError> {
        match subject {
            Some(subject) => {
                self.subjects.get(subject)?;
                Ok(vec![subject.to_string()])
            }
            None => Ok(self.subjects.keys().map(str::to_string).collect()),
        }
    }
}

/// Extracts every offering of a timetable page, skipping headings that fail.
pub fn parse_timetable(markup: &str, subject: &str, summary: &mut RunSummary) -> Vec<OfferingRecord> {
    let document = HtmlDocument::parse(markup);
    let headings = match offering_headings(&document, subject) {
        Ok(headings) => headings,
        Err(e) => {
            log_skipped(&e);
            summary.skipped += 1;
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(headings.len());
    for heading in &headings {
        match extract_offering(heading, subject) {
            Ok(record) => records.push(record),
            Err(e) => {
                log_skipped(&e);
                summary.skipped += 1;
            }
        }
    }
    records
}

fn log_skipped(e: &DocumentError) {
    warn!(
        document = %e.document,
        field = e.field,
        category = ?e.category(),
        error = %e.source,
        "Skipping document"
    );
}
