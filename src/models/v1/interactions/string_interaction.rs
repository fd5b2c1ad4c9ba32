//! Free-text interaction (QTI 1.2)
//!
//! Essay-style items. There is no structured scoring here: the "correct
//! response" surface is the literal feedback content, passed through as-is.

use roxmltree::Node;

use crate::errors::Result;
use crate::models::interaction::{Interaction, TextInteraction};
use crate::models::source::Source;
use crate::xmlutil;

pub(crate) fn matches(item: Node, _source: &Source) -> Result<Option<Interaction>> {
    let is_essay = super::question_type(item).as_deref() == Some("essay_question");
    let unscored_fib = xmlutil::descendant(item, "render_fib").is_some()
        && xmlutil::descendant(item, "varequal").is_none();
    if !(is_essay || unscored_fib) {
        return Ok(None);
    }
    Ok(Some(Interaction::Text(TextInteraction {
        feedback: feedback_text(item),
    })))
}

/// Concatenated `itemfeedback/flow_mat/material/mattext` content.
fn feedback_text(item: Node) -> String {
    let mut out = String::new();
    for feedback in xmlutil::descendants(item, "itemfeedback") {
        for flow in feedback
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "flow_mat")
        {
            for material in flow
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "material")
            {
                for mattext in material
                    .children()
                    .filter(|n| n.is_element() && n.tag_name().name() == "mattext")
                {
                    out.push_str(&xmlutil::collect_text(mattext));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::v1::interactions::classify;
    use crate::models::v1::CorrectResponses;
    use roxmltree::Document;

    const ESSAY: &str = r#"
        <item ident="e1" title="Essay">
          <itemmetadata>
            <qtimetadata>
              <qtimetadatafield>
                <fieldlabel>question_type</fieldlabel>
                <fieldentry>essay_question</fieldentry>
              </qtimetadatafield>
            </qtimetadata>
          </itemmetadata>
          <presentation>
            <material><mattext>Discuss the causes.</mattext></material>
            <response_str ident="response1" rcardinality="Single">
              <render_fib><response_label ident="answer1" rshuffle="No"/></render_fib>
            </response_str>
          </presentation>
          <itemfeedback ident="general_fb">
            <flow_mat><material><mattext>Look for key themes.</mattext></material></flow_mat>
          </itemfeedback>
        </item>"#;

    #[test]
    fn test_essay_classifies_as_text_with_feedback() {
        let doc = Document::parse(ESSAY).unwrap();
        let source = Source::from_string(ESSAY).unwrap();
        let interaction = classify(doc.root_element(), &source).unwrap();
        let Interaction::Text(text) = &interaction else {
            panic!("expected text interaction");
        };
        assert_eq!(text.feedback, "Look for key themes.");
        assert!(interaction.scoring_data().is_empty());
    }

    #[test]
    fn test_item_feedback_surfaces_as_correct_responses() {
        let doc = Document::parse(ESSAY).unwrap();
        let source = Source::from_string(ESSAY).unwrap();
        let item = crate::models::v1::AssessmentItem::from_node(doc.root_element(), &source).unwrap();
        assert_eq!(
            item.correct_responses(),
            &CorrectResponses::Feedback("Look for key themes.".to_string())
        );
    }

    #[test]
    fn test_scored_fib_is_not_claimed() {
        let xml = r#"<item ident="x">
            <presentation><response_str ident="r"><render_fib/></response_str></presentation>
            <resprocessing>
              <respcondition><conditionvar><varequal respident="r">a</varequal></conditionvar></respcondition>
            </resprocessing>
        </item>"#;
        let doc = Document::parse(xml).unwrap();
        let source = Source::from_string(xml).unwrap();
        assert!(matches(doc.root_element(), &source).unwrap().is_none());
    }
}
