//! Narrow DOM capability consumed by the extractors.
//!
//! The extractors only need to run structural queries against a document and
//! walk text, children and siblings of the located nodes. Any HTML library can
//! sit behind these traits; [`html`] provides one built on `scraper`.

pub mod html;

pub use html::{HtmlDocument, HtmlNode};

use crate::error::ScrapeError;

/// A direct child of a [`Node`].
#[derive(Debug, Clone)]
pub enum Child<N> {
    Element(N),
    Text(String),
    /// Comments, processing instructions and the like
    Other,
}

/// A located element.
pub trait Node: Clone + Sized {
    /// Concatenated text of all descendant text nodes, untrimmed.
    fn text(&self) -> String;

    /// Lower-case tag name.
    fn tag_name(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;

    /// Direct children in document order, including text nodes.
    fn children(&self) -> Vec<Child<Self>>;

    /// The next element sibling, skipping text and comment nodes.
    fn next_element_sibling(&self) -> Option<Self>;

    /// Descendants matching `query`, in document order.
    fn select(&self, query: &str) -> Result<Vec<Self>, ScrapeError>;

    fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    fn is(&self, tag: &str) -> bool {
        self.tag_name().eq_ignore_ascii_case(tag)
    }

    /// Direct element children with the given tag name.
    fn child_elements(&self, tag: &str) -> Vec<Self> {
        self.children()
            .into_iter()
            .filter_map(|child| match child {
                Child::Element(node) if node.is(tag) => Some(node),
                _ => None,
            })
            .collect()
    }
}

/// A parsed markup document.
pub trait Document {
    type Node<'a>: Node
    where
        Self: 'a;

    /// Elements matching `query`, in document order.
    fn select<'a>(&'a self, query: &str) -> Result<Vec<Self::Node<'a>>, ScrapeError>;
}

/// Scans forward through the element siblings of `node` and returns the first
/// one with tag `tag`, stopping at the end of the sibling chain or at the
/// first sibling whose tag is in `stop_at`.
pub fn next_matching_sibling<N: Node>(node: &N, tag: &str, stop_at: &[&str]) -> Option<N> {
    let mut current = node.next_element_sibling();
    while let Some(sibling) = current {
        if sibling.is(tag) {
            return Some(sibling);
        }
        if stop_at.iter().any(|stop| sibling.is(stop)) {
            return None;
        }
        current = sibling.next_element_sibling();
    }
    None
}
