//! Text extraction for labelled blocks on course pages.

use crate::dom::{Child, Node};
use crate::error::ScrapeError;

/// Returns the trimmed text of a bolded-label block, or `None` when the
/// selection is empty.
pub fn bolded_text<N: Node>(selection: &[N]) -> Option<String> {
    if selection.is_empty() {
        return None;
    }
    let text: String = selection.iter().map(Node::text).collect();
    Some(text.trim().to_string())
}

/// Returns the value of a small label such as
/// `<h5><strong>Course Weight:</strong> 0.50</h5>`.
///
/// The first node must have at least two children and the second child must be
/// a text node. There is no fallback: if the label exists but has a different
/// shape, the catalog layout changed.
pub fn small_label_text<N: Node>(selection: &[N]) -> Result<Option<String>, ScrapeError> {
    let Some(header) = selection.first() else {
        return Ok(None);
    };

    let children = header.children();
    if children.len() < 2 {
        return Err(ScrapeError::MalformedLabelStructure {
            reason: format!(
                "the small label element has {} child nodes, expected at least 2",
                children.len()
            ),
        });
    }

    match &children[1] {
        Child::Text(text) => Ok(Some(text.trim().to_string())),
        _ => Err(ScrapeError::MalformedLabelStructure {
            reason: "the second child node for the small label is not a text node".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, HtmlDocument};

    fn doc(body: &str) -> HtmlDocument {
        HtmlDocument::parse(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn test_bolded_text() {
        let d = doc("<div class='x'>\n  Extra info here.\n</div>");
        let sel = d.select("div.x").unwrap();
        assert_eq!(bolded_text(&sel).as_deref(), Some("Extra info here."));

        let empty = d.select("div.missing").unwrap();
        assert_eq!(bolded_text(&empty), None);
    }

    #[test]
    fn test_small_label_text() {
        let d = doc("<h5><strong>Course Weight:</strong> 0.50 </h5>");
        let sel = d.select("h5").unwrap();
        assert_eq!(small_label_text(&sel).unwrap().as_deref(), Some("0.50"));
    }

    #[test]
    fn test_small_label_absent() {
        let d = doc("<p>nothing</p>");
        let sel = d.select("h5").unwrap();
        assert_eq!(small_label_text(&sel).unwrap(), None);
    }

    #[test]
    fn test_small_label_too_few_children() {
        let d = doc("<h5>Course Weight: 0.50</h5>");
        let sel = d.select("h5").unwrap();
        assert!(matches!(
            small_label_text(&sel),
            Err(ScrapeError::MalformedLabelStructure { .. })
        ));
    }

    #[test]
    fn test_small_label_second_child_not_text() {
        let d = doc("<h5><strong>Breadth:</strong><em>Category B</em></h5>");
        let sel = d.select("h5").unwrap();
        let err = small_label_text(&sel).unwrap_err();
        assert!(err.to_string().contains("not a text node"));
    }
}
