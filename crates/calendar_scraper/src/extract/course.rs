//! Course information page extraction.

use super::header::parse_heading;
use super::label::{bolded_text, small_label_text};
use super::links::location_from_link;
use super::requisites::{split_requisites, strip_line_breaks};
use crate::dom::{Document, Node};
use crate::error::{DocumentError, FieldContext, ScrapeError};
use crate::types::{course_code, Breadth, CourseRecord};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

const HEADING_QUERY: &str = "#CourseInformationDiv > div.col-md-12:first-of-type > h2";
const NAME_QUERY: &str = "#CourseInformationDiv > div.col-md-12:first-of-type > h3";
// Matches both the description div and the requisite div that follows it
const DESCRIPTION_QUERY: &str =
    r#"#CourseInformationDiv > .col-xs-12 > label[for="CourseDescription"] + div"#;
const ANTIREQUISITES_QUERY: &str =
    r#"#CourseInformationDiv > div > label[for="Antirequisites"] + div"#;
const EXTRA_INFORMATION_QUERY: &str =
    r#"#CourseInformationDiv > div > label[for="ExtraInformation"] + div"#;
const WEIGHT_QUERY: &str = "#CourseInformationDiv > .col-xs-12:last-of-type > h5:nth-child(1)";
const BREADTH_QUERY: &str = "#CourseInformationDiv > .col-xs-12:last-of-type > h5:nth-child(2)";
const SUBJECT_CODE_QUERY: &str =
    "#CourseInformationDiv > .col-xs-12:last-of-type > h5:nth-child(3)";
const LOCATION_ANCHOR_QUERY: &str = ".col-xs-12 > a";

static CATEGORY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Category\s+([ABC])").unwrap());

/// Builds a [`CourseRecord`] from a course information page.
///
/// # Arguments
/// * `document` - The parsed course page
/// * `link` - The URL the page was fetched from; its campus location becomes
///   the first entry of `locations`
///
/// # Returns
/// * `Ok(CourseRecord)` - The assembled record
/// * `Err(DocumentError)` - The first field that could not be extracted
pub fn extract_course<D: Document>(document: &D, link: &str) -> Result<CourseRecord, DocumentError> {
    let select = |query: &str, field: &'static str| document.select(query).in_field(link, field);

    let heading_nodes = select(HEADING_QUERY, "courseCode")?;
    let heading_text = heading_nodes
        .first()
        .map(Node::trimmed_text)
        .unwrap_or_default();
    let heading = parse_heading(&heading_text).in_field(link, "courseCode")?;

    let name = select(NAME_QUERY, "name")?
        .first()
        .map(Node::trimmed_text)
        .unwrap_or_default();

    let description_nodes = select(DESCRIPTION_QUERY, "description")?;
    let description = description_nodes
        .first()
        .map(Node::trimmed_text)
        .unwrap_or_default();
    let requisite_text = bolded_text(description_nodes.get(1..2).unwrap_or_default())
        .map(|text| strip_line_breaks(&text));
    let requisites = split_requisites(requisite_text.as_deref());

    let antirequisites = bolded_text(&select(ANTIREQUISITES_QUERY, "antirequisites")?);
    let extra_information = bolded_text(&select(EXTRA_INFORMATION_QUERY, "extraInformation")?);

    let weight_text =
        small_label_text(&select(WEIGHT_QUERY, "weight")?).in_field(link, "weight")?;
    let weight = parse_weight(weight_text.as_deref());
    if weight.is_nan() {
        warn!(link = %link, text = ?weight_text, "Course weight is not a number");
    }

    let breadth_text =
        small_label_text(&select(BREADTH_QUERY, "breadth")?).in_field(link, "breadth")?;
    let breadth = breadth_text
        .as_deref()
        .map(parse_breadth)
        .transpose()
        .in_field(link, "breadth")?;

    let subject_code = small_label_text(&select(SUBJECT_CODE_QUERY, "subjectCode")?)
        .and_then(|text| text.ok_or(ScrapeError::MissingField))
        .in_field(link, "subjectCode")?;

    let locations = extract_locations(document, link).in_field(link, "locations")?;

    debug!(
        link = %link,
        subject_code = %subject_code,
        course_number = %heading.course_number,
        locations = locations.len(),
        "Extracted course record"
    );

    Ok(CourseRecord {
        link: link.to_string(),
        name,
        course_code: course_code(&subject_code, &heading.course_number),
        subject_code,
        course_number: heading.course_number.clone(),
        description,
        weight,
        breadth,
        extra_information,
        prerequisites: requisites.prerequisites,
        corequisites: requisites.corequisites,
        pre_or_corequisites: requisites.pre_or_corequisites,
        locations,
        valid_suffixes: heading.suffix_strings(),
        antirequisites,
    })
}

/// Parses the course weight label.
///
/// A missing or blank label reads as `0.0`; text that is not a number reads
/// as `NaN`.
pub fn parse_weight(text: Option<&str>) -> f64 {
    match text.map(str::trim) {
        None | Some("") => 0.0,
        Some(text) => text.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// Parses `"Category B"` (any case) into a [`Breadth`].
pub fn parse_breadth(text: &str) -> Result<Breadth, ScrapeError> {
    CATEGORY_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Breadth::from_letter(m.as_str()))
        .ok_or_else(|| ScrapeError::UnrecognizedBreadthCategory {
            text: text.to_string(),
        })
}

/// Location of the page's own link, then every linked campus listing in
/// document order.
fn extract_locations<D: Document>(document: &D, link: &str) -> Result<Vec<String>, ScrapeError> {
    let primary = location_from_link(link).ok_or_else(|| ScrapeError::LocationUnresolvable {
        link: link.to_string(),
    })?;

    let mut locations = vec![primary];
    for anchor in document.select(LOCATION_ANCHOR_QUERY)? {
        if let Some(location) = anchor.attr("href").as_deref().and_then(location_from_link) {
            locations.push(location);
        }
    }
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;
    use crate::error::ErrorCategory;

    const MAIN_LINK: &str = "https://www.westerncalendar.uwo.ca/Courses.cfm?CourseAcadCalendarID=MAIN_018802_1&SelectedCalendar=Live&ArchiveID=";

    fn course_page(breadth: &str, requisites: &str, other_campuses: &str) -> String {
        format!(
            r#"<html><body>
<div id="CourseInformationDiv">
  <div class="col-md-12">
    <h2>CALCULUS 1000A/B</h2>
    <h3>Calculus I</h3>
  </div>
  <div class="col-xs-12">
    <label for="CourseDescription">Course Description</label>
    <div>
      Review of limits and derivatives.
    </div>
    <label for="CourseDescription">Requisites</label>
    <div>{requisites}</div>
  </div>
  <div class="col-xs-12">
    <label for="Antirequisites">Antirequisite(s):</label>
    <div>Calculus 1500A/B.</div>
  </div>
  <div class="col-xs-12">
    <label for="ExtraInformation">Extra Information:</label>
    <div> 3 lecture hours. </div>
  </div>
  <div class="col-xs-12">
    {other_campuses}
  </div>
  <div class="col-xs-12"><h5><strong>Course Weight:</strong> 0.50</h5>{breadth}<h5><strong>Subject Code:</strong> CALCULUS</h5></div>
</div>
</body></html>"#
        )
    }

    fn parse(html: &str, link: &str) -> Result<CourseRecord, DocumentError> {
        extract_course(&HtmlDocument::parse(html), link)
    }

    const BREADTH_C: &str = "<h5><strong>Breadth:</strong> CATEGORY c</h5>";

    #[test]
    fn test_full_record() {
        let html = course_page(
            BREADTH_C,
            "Prerequisite(s): One or more of Mathematics 0110A/B\n or 0105A/B. Pre-or Corequisite(s): Physics 1501A/B.",
            "",
        );
        let record = parse(&html, MAIN_LINK).unwrap();

        assert_eq!(record.link, MAIN_LINK);
        assert_eq!(record.name, "Calculus I");
        assert_eq!(record.subject_code, "CALCULUS");
        assert_eq!(record.course_number, "1000");
        assert_eq!(record.course_code, "CALCULUS 1000");
        assert_eq!(record.description, "Review of limits and derivatives.");
        assert_eq!(record.weight, 0.5);
        assert_eq!(record.breadth, Some(Breadth::C));
        assert_eq!(record.extra_information.as_deref(), Some("3 lecture hours."));
        assert_eq!(record.antirequisites.as_deref(), Some("Calculus 1500A/B."));
        assert_eq!(
            record.prerequisites.as_deref(),
            Some("One or more of Mathematics 0110A/B or 0105A/B.")
        );
        assert_eq!(record.corequisites, None);
        assert_eq!(record.pre_or_corequisites.as_deref(), Some("Physics 1501A/B."));
        assert_eq!(record.locations, vec!["MAIN"]);
        assert_eq!(record.valid_suffixes, vec!["A", "B"]);
    }

    #[test]
    fn test_secondary_locations_in_document_order() {
        let anchors = r#"<a href="Courses.cfm?CourseAcadCalendarID=KINGS_018802_1&amp;SelectedCalendar=Live&amp;ArchiveID=">King's</a>
            <a href="/index.cfm">Home</a>"#;
        let html = course_page(BREADTH_C, "", anchors);
        let record = parse(&html, MAIN_LINK).unwrap();
        assert_eq!(record.locations, vec!["MAIN", "KINGS"]);
    }

    #[test]
    fn test_secondary_locations_keep_duplicates() {
        let anchors = r#"<a href="Courses.cfm?CourseAcadCalendarID=KINGS_018802_1&amp;SelectedCalendar=Live&amp;ArchiveID=">King's</a>
            <a href="Courses.cfm?CourseAcadCalendarID=MAIN_018802_1&amp;SelectedCalendar=Live&amp;ArchiveID=">Main</a>"#;
        let html = course_page(BREADTH_C, "", anchors);
        let record = parse(&html, MAIN_LINK).unwrap();
        assert_eq!(record.locations, vec!["MAIN", "KINGS", "MAIN"]);
    }

    #[test]
    fn test_link_without_location_fails() {
        let html = course_page(BREADTH_C, "", "");
        let err = parse(&html, "https://www.westerncalendar.uwo.ca/Courses.cfm").unwrap_err();
        assert_eq!(err.field, "locations");
        assert!(matches!(err.source, ScrapeError::LocationUnresolvable { .. }));
    }

    #[test]
    fn test_breadth_absent_is_not_an_error() {
        let html = course_page("", "", "")
            .replace("<h5><strong>Subject Code:</strong> CALCULUS</h5>", "");
        // Breadth resolves to None, so the first failure is the subject code
        let err = parse(&html, MAIN_LINK).unwrap_err();
        assert_eq!(err.field, "subjectCode");
        assert_eq!(err.source, ScrapeError::MissingField);
    }

    #[test]
    fn test_shifted_labels_reported_as_breadth() {
        // Without the breadth label the subject code moves to position 2
        let html = course_page("", "", "");
        let err = parse(&html, MAIN_LINK).unwrap_err();
        assert_eq!(err.field, "breadth");
        assert!(err.source.is_layout_drift());
    }

    #[test]
    fn test_unrecognized_breadth() {
        let html = course_page("<h5><strong>Breadth:</strong> Some unrelated text</h5>", "", "");
        let err = parse(&html, MAIN_LINK).unwrap_err();
        assert_eq!(err.field, "breadth");
        assert_eq!(err.category(), ErrorCategory::PatternMismatch);
    }

    #[test]
    fn test_heading_mismatch() {
        let html = course_page(BREADTH_C, "", "").replace("CALCULUS 1000A/B", "Calculus");
        let err = parse(&html, MAIN_LINK).unwrap_err();
        assert_eq!(err.field, "courseCode");
        assert!(matches!(err.source, ScrapeError::HeaderPatternMismatch { .. }));
    }

    #[test]
    fn test_parse_breadth() {
        assert_eq!(parse_breadth("Category B").unwrap(), Breadth::B);
        assert_eq!(parse_breadth("category   b").unwrap(), Breadth::B);
        assert_eq!(
            parse_breadth("Some unrelated text").unwrap_err(),
            ScrapeError::UnrecognizedBreadthCategory {
                text: "Some unrelated text".to_string()
            }
        );
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight(Some("0.50")), 0.5);
        assert_eq!(parse_weight(Some("1.00")), 1.0);
        assert_eq!(parse_weight(None), 0.0);
        assert_eq!(parse_weight(Some("  ")), 0.0);
        assert!(parse_weight(Some("0.50 or 1.00")).is_nan());
    }
}
