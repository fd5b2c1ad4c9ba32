//! QTI 1.2 assessment model

use std::path::Path;

use roxmltree::Document;

use crate::errors::{ImportError, Result};
use crate::models::source::Source;
use crate::models::v1::AssessmentItem;
use crate::models::v2::Stimulus;
use crate::paths::SafePath;
use crate::xmlutil;

/// An ordered reference to one item of an assessment. Items are built on
/// demand from the reference, not cached across re-parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef(pub(crate) usize);

impl ItemRef {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A QTI 1.2 assessment: a single document holding every item inline.
#[derive(Debug, Clone)]
pub struct Assessment {
    source: Source,
    title: String,
    item_count: usize,
}

impl Assessment {
    pub fn from_path(path: &Path, package_root: Option<&Path>) -> Result<Self> {
        Self::build(Source::from_path(path, package_root)?)
    }

    pub fn from_string(content: &str) -> Result<Self> {
        Self::build(Source::from_string(content)?)
    }

    fn build(source: Source) -> Result<Self> {
        let doc = Document::parse(source.content())?;
        let root = doc.root_element();
        let title = xmlutil::single(root, "assessment")?
            .and_then(|n| n.attribute("title"))
            .map(str::to_string)
            .or_else(|| source.file_stem())
            .unwrap_or_default();
        let item_count = xmlutil::descendants(root, "item").len();
        Ok(Self {
            source,
            title,
            item_count,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The ordered item references of this assessment.
    pub fn assessment_items(&self) -> Vec<ItemRef> {
        (0..self.item_count).map(ItemRef).collect()
    }

    /// Build the item behind a reference.
    pub fn create_assessment_item(&self, item_ref: ItemRef) -> Result<AssessmentItem> {
        let doc = Document::parse(self.source.content())?;
        let node = xmlutil::descendants(doc.root_element(), "item")
            .into_iter()
            .nth(item_ref.0)
            .ok_or_else(|| ImportError::Parse(format!("no item at index {}", item_ref.0)))?;
        AssessmentItem::from_node(node, &self.source)
    }

    /// Stimuli are a 2.x concept; a 1.2 assessment never has one.
    pub fn stimulus_ref(&self, _item_ref: ItemRef) -> Option<SafePath> {
        None
    }

    pub fn create_stimulus(&self, _item_ref: ItemRef) -> Result<Stimulus> {
        Err(ImportError::UnsupportedSchema(
            "stimulus not supported for this schema version".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSESSMENT: &str = r#"
        <questestinterop xmlns="http://www.imsglobal.org/xsd/ims_qtiasiv1p2">
          <assessment title="Unit 3 Quiz" ident="a1">
            <section ident="root_section">
              <item ident="i1" title="First">
                <presentation>
                  <material><mattext texttype="text/html">&lt;p&gt;Pick&lt;/p&gt;</mattext></material>
                  <response_lid ident="response1" rcardinality="Single">
                    <render_choice>
                      <response_label ident="A"><material><mattext>yes</mattext></material></response_label>
                      <response_label ident="B"><material><mattext>no</mattext></material></response_label>
                    </render_choice>
                  </response_lid>
                </presentation>
                <resprocessing>
                  <respcondition>
                    <conditionvar><varequal respident="response1">A</varequal></conditionvar>
                    <setvar action="Set">100</setvar>
                  </respcondition>
                </resprocessing>
              </item>
            </section>
          </assessment>
        </questestinterop>"#;

    #[test]
    fn test_title_and_item_listing() {
        let assessment = Assessment::from_string(ASSESSMENT).unwrap();
        assert_eq!(assessment.title(), "Unit 3 Quiz");
        assert_eq!(assessment.assessment_items().len(), 1);
    }

    #[test]
    fn test_items_are_rebuilt_per_reference() {
        let assessment = Assessment::from_string(ASSESSMENT).unwrap();
        let item_ref = assessment.assessment_items()[0];
        let first = assessment.create_assessment_item(item_ref).unwrap();
        let second = assessment.create_assessment_item(item_ref).unwrap();
        assert_eq!(first.identifier(), second.identifier());
    }

    #[test]
    fn test_out_of_range_reference_fails() {
        let assessment = Assessment::from_string(ASSESSMENT).unwrap();
        assert!(assessment.create_assessment_item(ItemRef(7)).is_err());
    }

    #[test]
    fn test_stimulus_is_unsupported() {
        let assessment = Assessment::from_string(ASSESSMENT).unwrap();
        let item_ref = assessment.assessment_items()[0];
        assert!(assessment.stimulus_ref(item_ref).is_none());
        assert!(matches!(
            assessment.create_stimulus(item_ref),
            Err(ImportError::UnsupportedSchema(_))
        ));
    }
}
