//! HTML fragment sanitization
//!
//! Turns untrusted embedded markup into safe, renderable fragments. The
//! input is parsed, walked, and re-emitted as a new string — nothing is
//! mutated in place, so the same fragment can be sanitized twice with
//! different settings (recursive object inclusion disables further object
//! import).
//!
//! Three ordered rules per element: object-reference resolution (when
//! enabled), legacy-tag remapping, then the relaxed whitelist. Unknown
//! elements are unwrapped (children survive); script-like elements are
//! removed with their content; object inclusion fails open by deleting the
//! element and logging a diagnostic, never by raising.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use lazy_static::lazy_static;
use quick_xml::escape::{escape, partial_escape};
use roxmltree::{Document, Node, NodeType};

use crate::errors::{ImportError, Result};
use crate::models::source::Source;

lazy_static! {
    /// Vendor/legacy QTI tags mapped onto standard block/inline equivalents.
    static ref ELEMENTS_REMAP: HashMap<&'static str, &'static str> = [
        ("prompt", "div"),
        ("simpleBlock", "div"),
        ("simpleInline", "span"),
        ("atomicBlock", "div"),
        ("atomicInline", "span"),
    ]
    .into_iter()
    .collect();

    /// Relaxed whitelist of renderable elements.
    static ref ALLOWED_ELEMENTS: HashSet<&'static str> = [
        "a", "abbr", "address", "b", "bdi", "bdo", "blockquote", "br", "caption",
        "cite", "code", "col", "colgroup", "dd", "del", "dfn", "div", "dl", "dt",
        "em", "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
        "i", "img", "ins", "kbd", "li", "mark", "ol", "p", "pre", "q", "rp", "rt",
        "ruby", "s", "samp", "small", "span", "strike", "strong", "sub", "sup",
        "table", "tbody", "td", "tfoot", "th", "thead", "time", "tr", "u", "ul",
        "var", "wbr",
    ]
    .into_iter()
    .collect();

    /// Elements removed together with their content.
    static ref REMOVE_WITH_CONTENT: HashSet<&'static str> = [
        "iframe", "noembed", "noframes", "noscript", "script", "style",
    ]
    .into_iter()
    .collect();

    /// Attributes allowed on every whitelisted element.
    static ref ALLOWED_ATTRIBUTES: HashSet<&'static str> = [
        "class", "dir", "hidden", "id", "lang", "style", "tabindex", "title",
        "translate",
    ]
    .into_iter()
    .collect();

    /// Per-element attribute whitelist on top of the global set.
    static ref ELEMENT_ATTRIBUTES: HashMap<&'static str, &'static [&'static str]> = [
        ("a", &["href", "hreflang", "name", "rel", "target"][..]),
        ("blockquote", &["cite"][..]),
        ("col", &["span", "width"][..]),
        ("colgroup", &["span", "width"][..]),
        ("del", &["cite", "datetime"][..]),
        ("img", &["align", "alt", "border", "height", "src", "srcset", "width"][..]),
        ("ins", &["cite", "datetime"][..]),
        ("ol", &["reversed", "start", "type"][..]),
        ("q", &["cite"][..]),
        ("table", &["summary", "width"][..]),
        ("td", &["abbr", "axis", "colspan", "rowspan", "width"][..]),
        ("th", &["abbr", "axis", "colspan", "rowspan", "scope", "width"][..]),
        ("time", &["datetime"][..]),
        ("ul", &["type"][..]),
    ]
    .into_iter()
    .collect();

    /// HTML named entities XML parsers do not know, as numeric references.
    static ref NAMED_ENTITIES: Vec<(&'static str, &'static str)> = vec![
        ("&nbsp;", "&#160;"),
        ("&copy;", "&#169;"),
        ("&reg;", "&#174;"),
        ("&times;", "&#215;"),
        ("&divide;", "&#247;"),
        ("&ndash;", "&#8211;"),
        ("&mdash;", "&#8212;"),
        ("&lsquo;", "&#8216;"),
        ("&rsquo;", "&#8217;"),
        ("&ldquo;", "&#8220;"),
        ("&rdquo;", "&#8221;"),
        ("&hellip;", "&#8230;"),
    ];
}

/// Sanitize an HTML fragment owned by `source`. `import_objects` controls
/// whether `<object>` references are resolved and inlined; recursive
/// inclusion always passes `false` here to bound the recursion.
pub fn sanitize_fragment(html: &str, source: &Source, import_objects: bool) -> Result<String> {
    if html.trim().is_empty() {
        return Ok(String::new());
    }
    let prepared = replace_named_entities(html);
    let wrapped = format!("<fragment>{prepared}</fragment>");
    let doc = Document::parse(&wrapped)
        .map_err(|e| ImportError::Parse(format!("unparseable content fragment: {e}")))?;
    let mut out = String::with_capacity(html.len());
    emit_children(doc.root_element(), source, import_objects, &mut out)?;
    Ok(out)
}

/// Sanitize the children of an already-parsed element (QTI 2.x bodies hold
/// their markup as real XML rather than escaped text).
pub fn sanitize_children(node: Node, source: &Source, import_objects: bool) -> Result<String> {
    let mut out = String::new();
    emit_children(node, source, import_objects, &mut out)?;
    Ok(out)
}

fn replace_named_entities(html: &str) -> String {
    let mut out = html.to_string();
    for (entity, replacement) in NAMED_ENTITIES.iter() {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    out
}

fn emit_children(parent: Node, source: &Source, import_objects: bool, out: &mut String) -> Result<()> {
    for node in parent.children() {
        match node.node_type() {
            NodeType::Text => out.push_str(&partial_escape(node.text().unwrap_or(""))),
            NodeType::Element => emit_element(node, source, import_objects, out)?,
            _ => {}
        }
    }
    Ok(())
}

fn emit_element(el: Node, source: &Source, import_objects: bool, out: &mut String) -> Result<()> {
    let raw_name = el.tag_name().name();

    if raw_name == "object" && import_objects {
        return emit_object(el, source, out);
    }

    let name = ELEMENTS_REMAP.get(raw_name).copied().unwrap_or(raw_name);

    if REMOVE_WITH_CONTENT.contains(name) {
        return Ok(());
    }
    if !ALLOWED_ELEMENTS.contains(name) {
        // unwrap: drop the tag, keep its children
        return emit_children(el, source, import_objects, out);
    }

    out.push('<');
    out.push_str(name);
    for attr in el.attributes() {
        if !attribute_allowed(name, attr.name(), attr.value()) {
            continue;
        }
        let _ = write!(out, " {}=\"{}\"", attr.name(), escape(attr.value()));
    }
    if el.children().next().is_none() {
        out.push_str("/>");
    } else {
        out.push('>');
        emit_children(el, source, import_objects, out)?;
        let _ = write!(out, "</{name}>");
    }
    Ok(())
}

fn attribute_allowed(element: &str, attribute: &str, value: &str) -> bool {
    let allowed = ALLOWED_ATTRIBUTES.contains(attribute)
        || ELEMENT_ATTRIBUTES
            .get(element)
            .is_some_and(|attrs| attrs.iter().any(|a| *a == attribute));
    if !allowed {
        return false;
    }
    if matches!(attribute, "href" | "src" | "cite" | "srcset") {
        let scheme = value.trim_start().to_ascii_lowercase();
        if scheme.starts_with("javascript:") || scheme.starts_with("vbscript:") {
            return false;
        }
    }
    true
}

/// Resolve an `<object>` reference into a safe replacement. Images become
/// `<img>` elements keeping the original reference; `text/html` targets are
/// read, recursively sanitized with object import disabled, and spliced in
/// as a `div`; everything else — unknown types, unresolvable or unreadable
/// references, string-backed sources — removes the element.
fn emit_object(el: Node, source: &Source, out: &mut String) -> Result<()> {
    let data = el.attribute("data");
    let path = match source.remap_href(data) {
        Ok(Some(path)) => path,
        Ok(None) => return Ok(()),
        Err(e) => {
            log::warn!("removing object with unresolvable reference {data:?}: {e}");
            return Ok(());
        }
    };

    let mime = el.attribute("type").unwrap_or("");
    if mime.starts_with("image/") {
        let _ = write!(out, "<img src=\"{}\"/>", escape(data.unwrap_or("")));
        return Ok(());
    }
    if mime == "text/html" {
        let imported = path
            .read_to_string()
            .and_then(|content| sanitize_fragment(&content, source, false));
        match imported {
            Ok(inner) => {
                out.push_str("<div>");
                out.push_str(&inner);
                out.push_str("</div>");
            }
            Err(e) => {
                log::warn!("failed to import html object {}: {e}", path.as_path().display());
            }
        }
        return Ok(());
    }
    // unrecognized object types are dropped from the sanitized fragment
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::source::Source;
    use std::fs;

    fn string_source() -> Source {
        Source::from_string("<root/>").unwrap()
    }

    #[test]
    fn test_whitelisted_fragment_is_unchanged() {
        let html = r#"<p class="x">hello <strong>world</strong><br/></p>"#;
        let out = sanitize_fragment(html, &string_source(), true).unwrap();
        assert_eq!(out, html);
    }

    #[test]
    fn test_legacy_tags_are_remapped() {
        let out = sanitize_fragment(
            "<prompt>Pick one:<simpleInline>hint</simpleInline></prompt>",
            &string_source(),
            true,
        )
        .unwrap();
        assert_eq!(out, "<div>Pick one:<span>hint</span></div>");
    }

    #[test]
    fn test_script_is_removed_with_content() {
        let out = sanitize_fragment(
            "<p>ok</p><script>alert('x')</script>",
            &string_source(),
            true,
        )
        .unwrap();
        assert_eq!(out, "<p>ok</p>");
    }

    #[test]
    fn test_unknown_element_is_unwrapped() {
        let out = sanitize_fragment("<widget><em>kept</em></widget>", &string_source(), true).unwrap();
        assert_eq!(out, "<em>kept</em>");
    }

    #[test]
    fn test_disallowed_attributes_are_dropped() {
        let out = sanitize_fragment(
            r#"<p onclick="evil()" class="x">t</p>"#,
            &string_source(),
            true,
        )
        .unwrap();
        assert_eq!(out, r#"<p class="x">t</p>"#);
    }

    #[test]
    fn test_javascript_href_is_dropped() {
        let out = sanitize_fragment(
            r#"<a href="javascript:alert(1)">x</a>"#,
            &string_source(),
            true,
        )
        .unwrap();
        assert_eq!(out, "<a>x</a>");
    }

    #[test]
    fn test_named_entities_survive() {
        let out = sanitize_fragment("<p>a&nbsp;b</p>", &string_source(), true).unwrap();
        assert_eq!(out, "<p>a\u{a0}b</p>");
    }

    #[test]
    fn test_object_from_string_source_is_removed() {
        // string-backed sources cannot resolve references at all
        let out = sanitize_fragment(
            r#"<p>before</p><object data="a.html" type="text/html"><p>fallback</p></object>"#,
            &string_source(),
            true,
        )
        .unwrap();
        assert_eq!(out, "<p>before</p>");
    }

    #[test]
    fn test_object_image_becomes_img() {
        let dir = tempfile::tempdir().unwrap();
        let item = dir.path().join("item.xml");
        fs::write(&item, "<item/>").unwrap();
        let source = Source::from_path(&item, Some(dir.path())).unwrap();

        let out = sanitize_fragment(
            r#"<object data="media/pic.png" type="image/png">alt</object>"#,
            &source,
            true,
        )
        .unwrap();
        assert_eq!(out, r#"<img src="media/pic.png"/>"#);
    }

    #[test]
    fn test_object_html_is_inlined_and_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("item.xml"), "<item/>").unwrap();
        fs::write(
            dir.path().join("extra.html"),
            "<p>included</p><script>alert(1)</script>",
        )
        .unwrap();
        let source = Source::from_path(&dir.path().join("item.xml"), Some(dir.path())).unwrap();

        let out = sanitize_fragment(
            r#"<object data="extra.html" type="text/html"/>"#,
            &source,
            true,
        )
        .unwrap();
        assert_eq!(out, "<div><p>included</p></div>");
    }

    #[test]
    fn test_object_escaping_root_is_removed_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("item.xml"), "<item/>").unwrap();
        let source = Source::from_path(&dir.path().join("item.xml"), Some(dir.path())).unwrap();

        let out = sanitize_fragment(
            r#"<p>kept</p><object data="../../etc/passwd" type="text/html"/>"#,
            &source,
            true,
        )
        .unwrap();
        assert_eq!(out, "<p>kept</p>");
    }

    #[test]
    fn test_object_unreadable_target_is_removed_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("item.xml"), "<item/>").unwrap();
        let source = Source::from_path(&dir.path().join("item.xml"), Some(dir.path())).unwrap();

        let out = sanitize_fragment(
            r#"<object data="missing.html" type="text/html"/><p>after</p>"#,
            &source,
            true,
        )
        .unwrap();
        assert_eq!(out, "<p>after</p>");
    }

    #[test]
    fn test_object_unknown_type_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("item.xml"), "<item/>").unwrap();
        fs::write(dir.path().join("movie.swf"), "x").unwrap();
        let source = Source::from_path(&dir.path().join("item.xml"), Some(dir.path())).unwrap();

        let out = sanitize_fragment(
            r#"<object data="movie.swf" type="application/x-shockwave-flash"/>"#,
            &source,
            true,
        )
        .unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_object_left_alone_without_import_unwraps() {
        // with object import disabled the element falls through the
        // whitelist and is unwrapped like any unknown tag
        let out = sanitize_fragment(
            r#"<object data="a.html" type="text/html"><p>fallback</p></object>"#,
            &string_source(),
            false,
        )
        .unwrap();
        assert_eq!(out, "<p>fallback</p>");
    }
}
