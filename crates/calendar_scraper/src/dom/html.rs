//! `scraper`-backed implementation of the DOM traits.

use super::{Child, Document, Node};
use crate::error::ScrapeError;
use scraper::node::Node as RawNode;
use scraper::{ElementRef, Html, Selector};

/// An HTML document parsed with html5ever.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }
}

/// An element inside an [`HtmlDocument`].
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a>(ElementRef<'a>);

fn parse_selector(query: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(query).map_err(|e| ScrapeError::InvalidQuery {
        query: query.to_string(),
        message: e.to_string(),
    })
}

impl Document for HtmlDocument {
    type Node<'a> = HtmlNode<'a>;

    fn select<'a>(&'a self, query: &str) -> Result<Vec<HtmlNode<'a>>, ScrapeError> {
        let selector = parse_selector(query)?;
        Ok(self.html.select(&selector).map(HtmlNode).collect())
    }
}

impl<'a> Node for HtmlNode<'a> {
    fn text(&self) -> String {
        self.0.text().collect::<String>()
    }

    fn tag_name(&self) -> String {
        self.0.value().name().to_ascii_lowercase()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(str::to_string)
    }

    fn children(&self) -> Vec<Child<Self>> {
        self.0
            .children()
            .map(|child| match child.value() {
                RawNode::Element(_) => ElementRef::wrap(child)
                    .map(|el| Child::Element(HtmlNode(el)))
                    .unwrap_or(Child::Other),
                RawNode::Text(text) => Child::Text(text.to_string()),
                _ => Child::Other,
            })
            .collect()
    }

    fn next_element_sibling(&self) -> Option<Self> {
        self.0
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(HtmlNode)
    }

    fn select(&self, query: &str) -> Result<Vec<Self>, ScrapeError> {
        let selector = parse_selector(query)?;
        Ok(self.0.select(&selector).map(HtmlNode).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::next_matching_sibling;

    const PAGE: &str = r#"
        <html><body>
          <div id="root">
            <h5><strong>Course Weight:</strong> 0.50</h5>
            <h4>Heading</h4>
            <!-- note -->
            <p>First</p>
            <span>skip</span>
            <table><tr><td>cell</td></tr></table>
          </div>
        </body></html>"#;

    #[test]
    fn test_children_include_text_nodes() {
        let doc = HtmlDocument::parse(PAGE);
        let h5 = doc.select("#root > h5").unwrap();
        assert_eq!(h5.len(), 1);

        let children = h5[0].children();
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[0], Child::Element(n) if n.is("strong")));
        assert!(matches!(&children[1], Child::Text(t) if t.trim() == "0.50"));
    }

    #[test]
    fn test_sibling_scan() {
        let doc = HtmlDocument::parse(PAGE);
        let heading = doc.select("#root > h4").unwrap().remove(0);

        let p = next_matching_sibling(&heading, "p", &[]).unwrap();
        assert_eq!(p.trimmed_text(), "First");

        let table = next_matching_sibling(&heading, "table", &[]).unwrap();
        // html5ever inserts the implied tbody
        assert_eq!(table.child_elements("tbody").len(), 1);

        assert!(next_matching_sibling(&heading, "ul", &[]).is_none());
        assert!(next_matching_sibling(&heading, "table", &["span"]).is_none());
    }

    #[test]
    fn test_invalid_query() {
        let doc = HtmlDocument::parse(PAGE);
        let err = doc.select("div[").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidQuery { .. }));
    }
}
