//! Math markup normalization
//!
//! Rewrites embedded MathML subtrees into inline LaTeX text before any model
//! parses the document. The replacement is a plain text run wrapped in
//! `\( … \)` delimiters and padded with non-breaking spaces so downstream
//! HTML sanitization cannot collapse the math into its neighbors.

use quick_xml::escape::partial_escape;
use roxmltree::{Document, Node};

use crate::errors::Result;
use crate::xmlutil;

const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// Replace every top-level `<math>` subtree in `xml` with its LaTeX text
/// form. Documents without math pass through unchanged.
pub fn normalize_math(xml: &str) -> Result<String> {
    let doc = Document::parse(xml)?;

    let mut replacements: Vec<(std::ops::Range<usize>, String)> = Vec::new();
    for node in doc.root().descendants().filter(|n| is_math(*n)) {
        if node.ancestors().skip(1).any(is_math) {
            continue;
        }
        // #160 spaces break LaTeX tokenization, convert them to #32 first
        let latex = mathml_to_latex(node).replace('\u{a0}', " ");
        let text = format!("&#160;\\({}\\)&#160;", partial_escape(latex.trim()));
        replacements.push((node.range(), text));
    }
    if replacements.is_empty() {
        return Ok(xml.to_string());
    }

    let mut out = String::with_capacity(xml.len());
    let mut pos = 0;
    for (range, text) in replacements {
        out.push_str(&xml[pos..range.start]);
        out.push_str(&text);
        pos = range.end;
    }
    out.push_str(&xml[pos..]);
    Ok(out)
}

fn is_math(node: Node) -> bool {
    node.is_element()
        && node.tag_name().name() == "math"
        && node
            .tag_name()
            .namespace()
            .map_or(true, |ns| ns == MATHML_NS)
}

/// Convert a MathML element to LaTeX-ish text. Covers the presentation
/// subset assessment content actually uses; unknown elements fall back to
/// concatenating their children.
fn mathml_to_latex(node: Node) -> String {
    let args: Vec<String> = node
        .children()
        .filter(|n| n.is_element())
        .map(mathml_to_latex)
        .collect();

    match node.tag_name().name() {
        "mi" | "mn" | "mo" | "mtext" | "ms" => xmlutil::collect_text(node),
        "msup" => format!("{}^{{{}}}", arg(&args, 0), arg(&args, 1)),
        "msub" => format!("{}_{{{}}}", arg(&args, 0), arg(&args, 1)),
        "msubsup" => format!(
            "{}_{{{}}}^{{{}}}",
            arg(&args, 0),
            arg(&args, 1),
            arg(&args, 2)
        ),
        "mfrac" => format!("\\frac{{{}}}{{{}}}", arg(&args, 0), arg(&args, 1)),
        "msqrt" => format!("\\sqrt{{{}}}", args.concat()),
        "mroot" => format!("\\sqrt[{}]{{{}}}", arg(&args, 1), arg(&args, 0)),
        "mfenced" => format!("({})", args.join(",")),
        "mspace" => " ".to_string(),
        "semantics" => arg(&args, 0).to_string(),
        "annotation" | "annotation-xml" => String::new(),
        _ => args.concat(),
    }
}

fn arg<'a>(args: &'a [String], index: usize) -> &'a str {
    args.get(index).map(String::as_str).unwrap_or("")
}
