//! QTI 1.2 interaction matchers
//!
//! A fixed, ordered list of matchers probes the item node; each either
//! declines or constructs the normalized interaction. First success wins,
//! exhaustion is a parse error. The order encodes the real
//! ambiguity-breaking rules: fill-blank claims its Canvas variants before
//! the structurally similar matching markup is considered.

pub(crate) mod choice;
pub(crate) mod fill_blank;
pub(crate) mod match_interaction;
pub(crate) mod numeric;
pub(crate) mod string_interaction;

use roxmltree::Node;

use crate::errors::{ImportError, Result};
use crate::models::interaction::Interaction;
use crate::models::source::Source;
use crate::models::v1::qti_metadata_entry;

pub(crate) fn classify(item: Node, source: &Source) -> Result<Interaction> {
    // Order matters.
    if let Some(interaction) = fill_blank::matches(item, source)? {
        return Ok(interaction);
    }
    if let Some(interaction) = match_interaction::matches(item, source)? {
        return Ok(interaction);
    }
    if let Some(interaction) = choice::matches(item, source)? {
        return Ok(interaction);
    }
    if let Some(interaction) = numeric::matches(item, source)? {
        return Ok(interaction);
    }
    if let Some(interaction) = string_interaction::matches(item, source)? {
        return Ok(interaction);
    }
    Err(ImportError::Parse(
        "no interaction recognized in item".into(),
    ))
}

/// The Canvas `question_type` metadata entry, when present.
pub(crate) fn question_type(item: Node) -> Option<String> {
    qti_metadata_entry(item, "question_type").map(|v| v.trim().to_string())
}

/// The item's declared response cardinality: the first
/// `response_lid`/`response_str`/`response_num` constraint found, assumed
/// uniform within the item.
pub(crate) fn rcardinality(item: Node) -> Option<String> {
    item.descendants()
        .filter(|n| {
            n.is_element()
                && matches!(
                    n.tag_name().name(),
                    "response_lid" | "response_str" | "response_num"
                )
        })
        .find_map(|n| n.attribute("rcardinality"))
        .map(str::to_string)
}

/// A `case` attribute is sensitive only when it says yes.
pub(crate) fn case_sensitive(node: Node) -> bool {
    node.attribute("case")
        .map(|v| v.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}
