//! QTI 2.x interaction matchers
//!
//! Same shape as the 1.2 list: ordered matchers, first success wins,
//! exhaustion is a parse error. Extended text is the one asymmetric case —
//! ambiguous markup raises instead of declining.

pub(crate) mod choice;
pub(crate) mod extended_text;
pub(crate) mod gap_match;

use roxmltree::Node;

use crate::errors::{ImportError, Result};
use crate::models::interaction::Interaction;
use crate::models::source::Source;

pub(crate) fn classify(item: Node, source: &Source) -> Result<Interaction> {
    if let Some(interaction) = choice::matches(item, source)? {
        return Ok(interaction);
    }
    if let Some(interaction) = gap_match::matches(item, source)? {
        return Ok(interaction);
    }
    if let Some(interaction) = extended_text::matches(item, source)? {
        return Ok(interaction);
    }
    Err(ImportError::Parse(
        "no interaction recognized in item".into(),
    ))
}
