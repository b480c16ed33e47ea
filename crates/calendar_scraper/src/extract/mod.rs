//! Extraction of course and offering records from catalog markup.
//!
//! Everything here is synchronous and stateless: each call reads one parsed
//! document and either returns a fully built record or a [`DocumentError`]
//! naming the field that failed.
//!
//! [`DocumentError`]: crate::error::DocumentError

pub mod course;
pub mod header;
pub mod label;
pub mod links;
pub mod offering;
pub mod requisites;

pub use course::extract_course;
pub use header::{parse_heading, CourseHeading};
pub use links::{course_links, location_from_link};
pub use offering::{extract_offering, extract_offerings, offering_headings};
pub use requisites::{split_requisites, Requisites};
