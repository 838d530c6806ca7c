//! HTML ingestion: converts `scraper`-parsed trees into [`Element`]s.
//!
//! Used to build page and fixture trees from markup; the element tree
//! itself stays mutable and observable after conversion. Inline
//! `onclick` attributes register a synthetic `click` listener so that
//! behavior detachment has something real to strip.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;
use url::Url;

use super::document::Document;
use super::element::Element;

/// Parse a complete HTML document into a [`Document`] rooted at its
/// `<html>` element.
#[must_use]
pub fn parse_document(location: Url, html: &str) -> Document {
    let parsed = Html::parse_document(html);
    let root = first_element(parsed.tree.root()).unwrap_or_else(|| Element::new("html"));
    Document::new(location, root)
}

/// Parse an HTML fragment. Returns the synthetic `<html>` container the
/// parser wraps fragments in; the fragment's own nodes are its children.
#[must_use]
pub fn parse_fragment(html: &str) -> Element {
    let parsed = Html::parse_fragment(html);
    first_element(parsed.tree.root()).unwrap_or_else(|| Element::new("html"))
}

fn first_element(node: NodeRef<'_, Node>) -> Option<Element> {
    node.children().find_map(convert)
}

fn convert(node: NodeRef<'_, Node>) -> Option<Element> {
    let source = node.value().as_element()?;
    let element = Element::new(source.name());
    for (name, value) in source.attrs() {
        element.set_attr(name, value);
    }
    if element.attr("onclick").is_some() {
        element.add_listener("click");
    }
    let mut text = String::new();
    let mut children = Vec::new();
    for child in node.children() {
        if let Some(t) = child.value().as_text() {
            text.push_str(&t.text);
        } else if let Some(child_element) = convert(child) {
            children.push(child_element);
        }
    }
    // Indentation-only text nodes are noise for text comparisons.
    if !text.trim().is_empty() {
        element.set_text(&text);
    }
    for child in children {
        element.append_child(child);
    }
    Some(element)
}
