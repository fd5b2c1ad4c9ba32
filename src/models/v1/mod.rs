//! QTI 1.2 model family

pub mod assessment;
pub mod assessment_item;
pub mod interactions;

pub use assessment::{Assessment, ItemRef};
pub use assessment_item::{AssessmentItem, CorrectResponses};

use roxmltree::Node;

use crate::xmlutil;

/// Look up a `qtimetadata` entry by field label.
pub(crate) fn qti_metadata_entry(item: Node, label: &str) -> Option<String> {
    let metadata = xmlutil::descendant(item, "qtimetadata")?;
    for field in xmlutil::descendants(metadata, "qtimetadatafield") {
        let Some(field_label) = xmlutil::descendant(field, "fieldlabel") else {
            continue;
        };
        if xmlutil::collect_text(field_label).trim() == label {
            return xmlutil::descendant(field, "fieldentry").map(xmlutil::collect_text);
        }
    }
    None
}

/// Inner markup of a node's `material/mattext`, empty when absent.
pub(crate) fn material_html(node: Node) -> String {
    xmlutil::descendant(node, "mattext")
        .map(xmlutil::inner_content)
        .unwrap_or_default()
}
