//! Extended text interaction (QTI 2.x)

use roxmltree::Node;

use crate::errors::{ImportError, Result};
use crate::models::interaction::{ExtendedTextInteraction, Interaction};
use crate::models::source::Source;
use crate::xmlutil;

/// Matches exactly one `extendedTextInteraction`. Zero declines; more than
/// one is ambiguous markup this importer refuses rather than ignores.
pub(crate) fn matches(item: Node, _source: &Source) -> Result<Option<Interaction>> {
    let found = xmlutil::descendants(item, "extendedTextInteraction");
    if found.is_empty() {
        return Ok(None);
    }
    if found.len() > 1 {
        return Err(ImportError::UnsupportedSchema(
            "multiple extendedTextInteraction elements".into(),
        ));
    }
    let node = found[0];
    Ok(Some(Interaction::ExtendedText(ExtendedTextInteraction {
        expected_lines: attr_u32(node, "expectedLines").unwrap_or(0),
        min_strings: attr_u32(node, "minStrings").unwrap_or(0),
        max_strings: attr_u32(node, "maxStrings"),
    })))
}

fn attr_u32(node: Node, name: &str) -> Option<u32> {
    node.attribute(name).and_then(|v| v.trim().parse().ok())
}
