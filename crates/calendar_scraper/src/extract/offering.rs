//! Master timetable extraction.
//!
//! A timetable page lists, per course, an `h4` heading followed by sibling
//! nodes holding a description paragraph and the schedule table:
//!
//! ```text
//! <div class="span12">
//!   <h4>CALCULUS 1000A - CALCULUS I</h4>
//!   <p>...</p>
//!   <table>
//!     <tbody><tr><td>001</td><td>LEC</td>...</tr></tbody>
//!   </table>
//! </div>
//! ```

use super::header::parse_heading;
use crate::dom::{next_matching_sibling, Document, Node};
use crate::error::{DocumentError, FieldContext, ScrapeError};
use crate::types::{course_code, MeetingRow, OfferingRecord};
use crate::weekday::{self, WeekdaySet};
use tracing::debug;

pub const HEADING_QUERY: &str = "div.span12 > h4";
const DAYS_QUERY: &str = ".daysTable > tbody > tr > td";

/// Number of cells in a schedule row.
pub const COLUMN_COUNT: usize = 11;

/// Returns the course headings of a timetable page.
pub fn offering_headings<'a, D: Document>(
    document: &'a D,
    subject: &str,
) -> Result<Vec<D::Node<'a>>, DocumentError> {
    document.select(HEADING_QUERY).in_field(subject, "headings")
}

/// Builds every [`OfferingRecord`] on a timetable page, failing on the first
/// heading that cannot be extracted.
pub fn extract_offerings<D: Document>(
    document: &D,
    subject: &str,
) -> Result<Vec<OfferingRecord>, DocumentError> {
    offering_headings(document, subject)?
        .iter()
        .map(|heading| extract_offering(heading, subject))
        .collect()
}

/// Builds the [`OfferingRecord`] for one course heading.
pub fn extract_offering<N: Node>(heading: &N, subject: &str) -> Result<OfferingRecord, DocumentError> {
    let heading_text = heading.trimmed_text();
    let code = parse_heading(&heading_text).in_field(subject, "courseCode")?;

    let table = next_matching_sibling(heading, "table", &[])
        .ok_or_else(|| ScrapeError::ScheduleTableNotFound {
            heading: heading_text.clone(),
        })
        .in_field(subject, "meetings")?;

    // The description paragraph sits between the heading and its table, never
    // past the next heading
    let description = next_matching_sibling(heading, "p", &["table", "h4"])
        .map(|p| p.trimmed_text())
        .unwrap_or_default();

    let meetings = parse_schedule_table(&table).in_field(subject, "meetings")?;

    debug!(
        subject = %subject,
        heading = %heading_text,
        meetings = meetings.len(),
        "Extracted course offering"
    );

    Ok(OfferingRecord {
        course_code: course_code(&code.subject, &code.course_number),
        suffixes: code.suffix_string(),
        subject_code: code.subject,
        course_number: code.course_number,
        description,
        meetings,
    })
}

/// Parses every body row of a schedule table.
///
/// Rows without `td` cells (header rows) are skipped.
pub fn parse_schedule_table<N: Node>(table: &N) -> Result<Vec<MeetingRow>, ScrapeError> {
    let mut rows = Vec::new();
    for body in table.child_elements("tbody") {
        for row in body.child_elements("tr") {
            let cells = row.child_elements("td");
            if cells.is_empty() {
                continue;
            }
            rows.push(parse_row(&cells)?);
        }
    }
    Ok(rows)
}

/// Reads one schedule row; cells are consumed strictly left to right.
pub fn parse_row<N: Node>(cells: &[N]) -> Result<MeetingRow, ScrapeError> {
    if cells.len() < COLUMN_COUNT {
        return Err(ScrapeError::MalformedScheduleRow {
            expected: COLUMN_COUNT,
            found: cells.len(),
        });
    }

    let text = |cell: Option<&N>| cell.map(Node::trimmed_text).unwrap_or_default();
    let mut cells = cells.iter();

    let section_number = text(cells.next());
    let component_type = text(cells.next());
    let class_number = text(cells.next());
    let weekday_mask = cells.next().map(scan_days).transpose()?.unwrap_or_default();
    let start_time = text(cells.next());
    let end_time = text(cells.next());
    let location = text(cells.next());
    let instructor_name = text(cells.next());
    let requisites_and_constraints = text(cells.next());
    let fill_status = text(cells.next());
    let campus = text(cells.next());

    Ok(MeetingRow {
        section_number,
        component_type,
        class_number,
        weekday_mask,
        start_time,
        end_time,
        location,
        instructor_name,
        requisites_and_constraints,
        fill_status,
        campus,
    })
}

/// Encodes the days of the nested days table in a schedule cell.
///
/// Blank cells are placeholders for days the section does not meet; every
/// other cell must be an exact token.
pub fn scan_days<N: Node>(cell: &N) -> Result<WeekdaySet, ScrapeError> {
    let tokens: Vec<String> = cell
        .select(DAYS_QUERY)?
        .iter()
        .map(Node::trimmed_text)
        .filter(|text| !text.is_empty())
        .collect();
    weekday::encode(&tokens)
}
