//! Course calendar links: campus locations and course discovery.

use crate::dom::{Child, Document, Node};
use crate::error::ScrapeError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

// Static patterns - compiled once
static LOCATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Courses\.cfm\?CourseAcadCalendarID=([A-Z]+)_.+?&SelectedCalendar=Live&ArchiveID=")
        .unwrap()
});
static COURSE_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Courses\.cfm\?CourseAcadCalendarID=[A-Z]+_(\d+)_\d+&SelectedCalendar=Live&ArchiveID=")
        .unwrap()
});
static MORE_DETAILS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)More\s+Details").unwrap());

/// Anchors on a subject listing page that may lead to course pages.
pub const COURSE_ANCHOR_QUERY: &str = ".col-md-12 .course .panel-body > .col-xs-12 a";

/// Returns the campus location token (e.g. `"MAIN"`) embedded in a course link.
pub fn location_from_link(link: &str) -> Option<String> {
    LOCATION_REGEX
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Returns the numeric course id shared by every campus listing of a course.
pub fn course_id_from_link(link: &str) -> Option<String> {
    COURSE_ID_REGEX
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_course_anchor<N: Node>(anchor: &N, href: &str) -> bool {
    if !anchor.is("a") || location_from_link(href).is_none() {
        return false;
    }
    matches!(
        anchor.children().first(),
        Some(Child::Text(text)) if MORE_DETAILS_REGEX.is_match(text)
    )
}

/// Collects the course information links on a subject listing page.
///
/// A course offered at several campuses is listed once per campus; links are
/// keyed by course id so each course is returned once, at the position of its
/// first listing and with the URL of its last.
pub fn course_links<D: Document>(document: &D, base_url: &Url) -> Result<Vec<String>, ScrapeError> {
    let mut links: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for anchor in document.select(COURSE_ANCHOR_QUERY)? {
        let Some(href) = anchor.attr("href") else {
            continue;
        };
        if !is_course_anchor(&anchor, &href) {
            continue;
        }
        let Some(course_id) = course_id_from_link(&href) else {
            debug!(href = %href, "Course link has no numeric course id, skipping");
            continue;
        };
        let absolute = match base_url.join(&href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                debug!(href = %href, error = %e, "Could not resolve course link, skipping");
                continue;
            }
        };

        match positions.get(&course_id) {
            Some(&i) => links[i] = absolute,
            None => {
                positions.insert(course_id, links.len());
                links.push(absolute);
            }
        }
    }

    Ok(links)
}
