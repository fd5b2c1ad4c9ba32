//! XML navigation helpers
//!
//! Thin wrappers over roxmltree that mirror the namespace-agnostic queries
//! the import pipeline makes everywhere: descendant lookup by local name,
//! the "exactly one match" check, whitespace squishing and inner-content
//! extraction.

use std::fmt::Write;

use quick_xml::escape::{escape, partial_escape};
use roxmltree::{Node, NodeType};

use crate::errors::{ImportError, Result};

/// All element descendants of `node` with the given local name, excluding
/// `node` itself, in document order.
pub(crate) fn descendants<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
    node.descendants()
        .filter(|n| n.id() != node.id() && n.is_element() && n.tag_name().name() == name)
        .collect()
}

/// First element descendant with the given local name.
pub(crate) fn descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.id() != node.id() && n.is_element() && n.tag_name().name() == name)
}

/// First direct element child with the given local name.
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Descendant lookup that fails when the name is ambiguous: more than one
/// match is a parse error, zero matches is `None`.
pub(crate) fn single<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Result<Option<Node<'a, 'input>>> {
    let found = descendants(node, name);
    if found.len() > 1 {
        return Err(ImportError::Parse(format!("too many matches for <{name}>")));
    }
    Ok(found.into_iter().next())
}

/// Concatenated text content of `node` and all its descendants.
pub(crate) fn collect_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Collapse all whitespace runs to single spaces and trim the ends.
pub(crate) fn squish(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Inner content of an element: serialized child markup when the element has
/// element children, plain text otherwise. Item bodies arrive both ways —
/// QTI 2.x bodies hold real elements while QTI 1.2 `mattext` usually holds
/// escaped HTML that the XML parser has already unescaped into text.
pub(crate) fn inner_content(node: Node) -> String {
    if !node.children().any(|n| n.is_element()) {
        return collect_text(node);
    }
    let mut out = String::new();
    for c in node.children() {
        serialize_into(c, &mut out);
    }
    out
}

fn serialize_into(node: Node, out: &mut String) {
    match node.node_type() {
        NodeType::Text => out.push_str(&partial_escape(node.text().unwrap_or(""))),
        NodeType::Element => {
            let name = node.tag_name().name();
            out.push('<');
            out.push_str(name);
            for attr in node.attributes() {
                let _ = write!(out, " {}=\"{}\"", attr.name(), escape(attr.value()));
            }
            if node.children().next().is_none() {
                out.push_str("/>");
            } else {
                out.push('>');
                for c in node.children() {
                    serialize_into(c, out);
                }
                let _ = write!(out, "</{name}>");
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_descendants_excludes_self() {
        let doc = Document::parse("<item><item/><other><item/></other></item>").unwrap();
        assert_eq!(descendants(doc.root_element(), "item").len(), 2);
    }

    #[test]
    fn test_single_rejects_ambiguity() {
        let doc = Document::parse("<r><a/><a/></r>").unwrap();
        assert!(matches!(
            single(doc.root_element(), "a"),
            Err(ImportError::Parse(_))
        ));
        assert!(single(doc.root_element(), "b").unwrap().is_none());
    }

    #[test]
    fn test_squish() {
        assert_eq!(squish("  a \n\t b  "), "a b");
    }

    #[test]
    fn test_inner_content_text_mode() {
        // escaped HTML inside a text-only element comes back unescaped
        let doc = Document::parse("<mattext>&lt;p&gt;hi&lt;/p&gt;</mattext>").unwrap();
        assert_eq!(inner_content(doc.root_element()), "<p>hi</p>");
    }

    #[test]
    fn test_inner_content_element_mode() {
        let doc = Document::parse(r#"<body><p class="x">a<br/>b</p></body>"#).unwrap();
        assert_eq!(
            inner_content(doc.root_element()),
            r#"<p class="x">a<br/>b</p>"#
        );
    }
}
