//! QTI 1.2 item model
//!
//! One eager value object per item: identifier, title, points, sanitized
//! body, classified interaction and the derived correct responses.

use roxmltree::Node;

use crate::errors::{ImportError, Result};
use crate::models::interaction::{Interaction, ScoringData};
use crate::models::source::Source;
use crate::models::v1::{interactions, qti_metadata_entry};
use crate::xmlutil;

/// The derived correct answers of a 1.2 item. Choice items carry plain
/// values, matching items carry source/target mappings, and free-text items
/// carry literal feedback content — an intentional shape difference.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectResponses {
    Values(Vec<String>),
    Mappings(Vec<(String, String)>),
    Feedback(String),
}

#[derive(Debug, Clone)]
pub struct AssessmentItem {
    identifier: String,
    title: String,
    points_possible: f64,
    body: String,
    interaction: Interaction,
    correct_responses: CorrectResponses,
}

impl AssessmentItem {
    pub(crate) fn from_node(node: Node, source: &Source) -> Result<Self> {
        let identifier = node
            .attribute("ident")
            .ok_or_else(|| ImportError::Parse("item is missing an ident attribute".into()))?
            .to_string();
        let title = node.attribute("title").unwrap_or_default().to_string();
        let points_possible = points_possible(node);
        let body = item_body(node, source)?;
        let interaction = interactions::classify(node, source)?;
        let correct_responses = correct_responses(&interaction);
        Ok(Self {
            identifier,
            title,
            points_possible,
            body,
            interaction,
            correct_responses,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn points_possible(&self) -> f64 {
        self.points_possible
    }

    /// The sanitized presentation body.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn correct_responses(&self) -> &CorrectResponses {
        &self.correct_responses
    }

    pub fn scoring_data(&self) -> &[ScoringData] {
        self.interaction.scoring_data()
    }
}

fn item_body(node: Node, source: &Source) -> Result<String> {
    let presentation = xmlutil::descendant(node, "presentation")
        .ok_or_else(|| ImportError::Parse("item has no presentation".into()))?;
    let mattext = xmlutil::descendant(presentation, "mattext")
        .ok_or_else(|| ImportError::Parse("item presentation has no mattext".into()))?;
    source.sanitize(&xmlutil::inner_content(mattext))
}

/// Points come from exactly one of two sources: a `points_possible`
/// metadata entry when present, otherwise the outcome variable's declared
/// maximum (falling back to its default, then zero).
fn points_possible(node: Node) -> f64 {
    if let Some(value) = qti_metadata_entry(node, "points_possible") {
        return value.trim().parse().unwrap_or(0.0);
    }
    decvar_max_value(node)
}

fn decvar_max_value(node: Node) -> f64 {
    let Some(decvar) = xmlutil::descendant(node, "decvar") else {
        return 0.0;
    };
    decvar
        .attribute("maxvalue")
        .and_then(|v| v.trim().parse().ok())
        .or_else(|| {
            decvar
                .attribute("defaultval")
                .and_then(|v| v.trim().parse().ok())
        })
        .unwrap_or(0.0)
}

fn correct_responses(interaction: &Interaction) -> CorrectResponses {
    match interaction {
        Interaction::Choice(choice) => CorrectResponses::Values(
            choice
                .scoring_data
                .first()
                .map(|s| vec![s.value.clone()])
                .unwrap_or_default(),
        ),
        Interaction::Match(matching) => CorrectResponses::Mappings(
            matching
                .scoring_data
                .iter()
                .map(|s| (s.value.clone(), s.id.clone()))
                .collect(),
        ),
        Interaction::Text(text) => CorrectResponses::Feedback(text.feedback.clone()),
        _ => CorrectResponses::Values(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interaction::InteractionKind;
    use roxmltree::Document;

    fn item_source(xml: &str) -> (Document, Source) {
        let source = Source::from_string(xml).unwrap();
        let doc = Document::parse(xml).unwrap();
        (doc, source)
    }

    fn choice_item(metadata: &str, outcomes: &str) -> String {
        format!(
            r#"<item ident="i1" title="Sample">
                 <itemmetadata>{metadata}</itemmetadata>
                 <presentation>
                   <material><mattext texttype="text/html">&lt;p&gt;Which?&lt;/p&gt;</mattext></material>
                   <response_lid ident="response1" rcardinality="Single">
                     <render_choice>
                       <response_label ident="QUE_1"><material><mattext>first</mattext></material></response_label>
                       <response_label ident="QUE_2"><material><mattext>second</mattext></material></response_label>
                     </render_choice>
                   </response_lid>
                 </presentation>
                 <resprocessing>
                   <outcomes>{outcomes}</outcomes>
                   <respcondition>
                     <conditionvar><varequal respident="response1"> QUE_1 </varequal></conditionvar>
                   </respcondition>
                 </resprocessing>
               </item>"#
        )
    }

    #[test]
    fn test_identifier_is_required() {
        let (doc, source) = item_source(r#"<item title="x"><presentation/></item>"#);
        let err = AssessmentItem::from_node(doc.root_element(), &source).unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn test_metadata_points_win_over_decvar() {
        let xml = choice_item(
            r#"<qtimetadata>
                 <qtimetadatafield><fieldlabel>points_possible</fieldlabel><fieldentry>2.5</fieldentry></qtimetadatafield>
               </qtimetadata>"#,
            r#"<decvar maxvalue="100" minvalue="0" varname="SCORE" vartype="Decimal"/>"#,
        );
        let (doc, source) = item_source(&xml);
        let item = AssessmentItem::from_node(doc.root_element(), &source).unwrap();
        assert_eq!(item.points_possible(), 2.5);
    }

    #[test]
    fn test_decvar_fallback_order() {
        let xml = choice_item("", r#"<decvar defaultval="4" varname="SCORE" vartype="Decimal"/>"#);
        let (doc, source) = item_source(&xml);
        let item = AssessmentItem::from_node(doc.root_element(), &source).unwrap();
        assert_eq!(item.points_possible(), 4.0);

        let xml = choice_item("", r#"<decvar varname="SCORE" vartype="Decimal"/>"#);
        let (doc, source) = item_source(&xml);
        let item = AssessmentItem::from_node(doc.root_element(), &source).unwrap();
        assert_eq!(item.points_possible(), 0.0);
    }

    #[test]
    fn test_body_is_sanitized_html() {
        let xml = choice_item("", "");
        let (doc, source) = item_source(&xml);
        let item = AssessmentItem::from_node(doc.root_element(), &source).unwrap();
        assert_eq!(item.body(), "<p>Which?</p>");
        assert_eq!(item.title(), "Sample");
        assert_eq!(item.identifier(), "i1");
    }

    #[test]
    fn test_choice_correct_responses_squish_text() {
        let xml = choice_item("", "");
        let (doc, source) = item_source(&xml);
        let item = AssessmentItem::from_node(doc.root_element(), &source).unwrap();
        assert_eq!(item.interaction().kind(), InteractionKind::Choice);
        assert_eq!(
            item.correct_responses(),
            &CorrectResponses::Values(vec!["QUE_1".to_string()])
        );
    }

    #[test]
    fn test_choice_without_varequal_has_empty_responses() {
        let xml = choice_item("", "").replace(
            r#"<varequal respident="response1"> QUE_1 </varequal>"#,
            "",
        );
        let (doc, source) = item_source(&xml);
        let item = AssessmentItem::from_node(doc.root_element(), &source).unwrap();
        assert_eq!(
            item.correct_responses(),
            &CorrectResponses::Values(Vec::new())
        );
        assert!(item.scoring_data().is_empty());
    }
}
