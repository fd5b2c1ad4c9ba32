//! Fill-in-the-blank interaction (QTI 1.2)
//!
//! Covers both plain QTI fill-blank markup (`response_str` + `render_fib`)
//! and the Canvas multi-blank variant, where several `response_lid`
//! dropdowns stand in for bracketed tokens inside one prompt. The
//! multi-blank predicate changes which stem-building algorithm runs, not
//! which variant is selected. Decimal fill-blank is a distinct case this
//! matcher deliberately declines.

use lazy_static::lazy_static;
use regex::Regex;
use roxmltree::Node;

use crate::errors::Result;
use crate::models::interaction::{
    AnswerChoice, FillBlankInteraction, Interaction, ResponseType, ScoringData, StemItem,
};
use crate::models::source::Source;
use crate::models::v1::material_html;
use crate::xmlutil;

lazy_static! {
    /// Canvas inline blank tokens: `[blank_name]`.
    static ref CANVAS_BLANK: Regex = Regex::new(r"\[.+?\]").unwrap();
}

pub(crate) fn matches(item: Node, source: &Source) -> Result<Option<Interaction>> {
    if xmlutil::descendant(item, "other").is_some() {
        return Ok(None);
    }
    let question_type = super::question_type(item);
    if question_type.as_deref() == Some("essay_question") {
        return Ok(None);
    }
    let multi_blank = canvas_multiple_fib(item);
    let probe = if multi_blank {
        xmlutil::descendant(item, "response_lid")
    } else {
        xmlutil::descendant(item, "render_fib")
    };
    let Some(probe) = probe else {
        return Ok(None);
    };
    if probe.attribute("fibtype") == Some("Decimal") {
        return Ok(None);
    }
    build(item, source, multi_blank).map(Some)
}

/// The Canvas multi-blank predicate.
pub(crate) fn canvas_multiple_fib(item: Node) -> bool {
    super::question_type(item).as_deref() == Some("fill_in_multiple_blanks_question")
}

fn build(item: Node, source: &Source, multi_blank: bool) -> Result<Interaction> {
    let cardinality = ResponseType::from_rcardinality(super::rcardinality(item).as_deref());
    let stem_items = if multi_blank {
        canvas_stem_items(item)
    } else {
        qti_stem_items(item)
    };
    let blanks = blanks(item);
    let (answers, scoring_data) = if multi_blank {
        canvas_answers(item, source, cardinality)?
    } else {
        qti_answers(item, cardinality)
    };
    Ok(Interaction::FillBlank(FillBlankInteraction {
        multi_blank,
        stem_items,
        blanks,
        answers,
        scoring_data,
    }))
}

/// Split the prompt text on bracketed tokens; each token becomes a blank
/// tied to the `response_lid` whose label appears inside it.
fn canvas_stem_items(item: Node) -> Vec<StemItem> {
    let prompt = xmlutil::descendant(item, "mattext")
        .map(xmlutil::collect_text)
        .unwrap_or_default();
    let lids = xmlutil::descendants(item, "response_lid");

    let mut segments: Vec<(String, bool)> = Vec::new();
    let mut last = 0;
    for token in CANVAS_BLANK.find_iter(&prompt) {
        if token.start() > last {
            segments.push((prompt[last..token.start()].to_string(), false));
        }
        segments.push((prompt[token.start()..token.end()].to_string(), true));
        last = token.end();
    }
    if last < prompt.len() {
        segments.push((prompt[last..].to_string(), false));
    }

    segments
        .into_iter()
        .enumerate()
        .map(|(index, (value, is_blank))| {
            if is_blank {
                let blank_id = lids
                    .iter()
                    .find(|lid| {
                        let label = xmlutil::descendant(**lid, "mattext")
                            .map(xmlutil::collect_text)
                            .unwrap_or_default();
                        !label.is_empty() && value.contains(label.trim())
                    })
                    .and_then(|lid| lid.attribute("ident"))
                    .unwrap_or_default()
                    .to_string();
                StemItem::Blank {
                    id: format!("stem_{index}"),
                    position: index + 1,
                    blank_id,
                }
            } else {
                StemItem::Text {
                    id: format!("stem_{index}"),
                    position: index + 1,
                    value,
                }
            }
        })
        .collect()
}

/// Plain QTI stems: presentation children in order, blanks where a child
/// renders a fill-in field.
fn qti_stem_items(item: Node) -> Vec<StemItem> {
    let Some(presentation) = xmlutil::descendant(item, "presentation") else {
        return Vec::new();
    };
    presentation
        .children()
        .filter(|n| n.is_element())
        .enumerate()
        .map(|(index, child)| {
            if xmlutil::descendant(child, "render_fib").is_some() {
                StemItem::Blank {
                    id: format!("stem_{index}"),
                    position: index + 1,
                    blank_id: child.attribute("ident").unwrap_or_default().to_string(),
                }
            } else {
                StemItem::Text {
                    id: format!("stem_{index}"),
                    position: index + 1,
                    value: xmlutil::collect_text(child),
                }
            }
        })
        .collect()
}

fn blanks(item: Node) -> Vec<String> {
    let nodes = if xmlutil::descendant(item, "render_choice").is_some() {
        xmlutil::descendants(item, "response_label")
    } else {
        xmlutil::descendants(item, "response_str")
    };
    nodes
        .into_iter()
        .filter_map(|n| n.attribute("ident"))
        .map(str::to_string)
        .collect()
}

/// Multi-blank answers: one per `response_label`, linked back to its
/// enclosing blank through the grandparent identifier.
fn canvas_answers(
    item: Node,
    source: &Source,
    cardinality: ResponseType,
) -> Result<(Vec<AnswerChoice>, Vec<ScoringData>)> {
    let labels = xmlutil::descendants(item, "response_label");
    let mut answers = Vec::with_capacity(labels.len());
    let mut scoring = Vec::with_capacity(labels.len());
    for label in labels {
        answers.push(AnswerChoice {
            ident: label.attribute("ident").unwrap_or_default().to_string(),
            body: source.sanitize(&material_html(label))?,
        });
        scoring.push(ScoringData {
            id: scoring_id(label),
            response_type: cardinality,
            value: xmlutil::collect_text(label).trim().to_string(),
            case_sensitive: super::case_sensitive(label),
            parent_identifier: grandparent_ident(label),
        });
    }
    Ok((answers, scoring))
}

/// Single-blank answers: one per `varequal` response condition.
fn qti_answers(item: Node, cardinality: ResponseType) -> (Vec<AnswerChoice>, Vec<ScoringData>) {
    let nodes = xmlutil::descendants(item, "varequal");
    let mut answers = Vec::with_capacity(nodes.len());
    let mut scoring = Vec::with_capacity(nodes.len());
    for varequal in nodes {
        let value = xmlutil::collect_text(varequal).trim().to_string();
        answers.push(AnswerChoice {
            ident: scoring_id(varequal),
            body: value.clone(),
        });
        scoring.push(ScoringData {
            id: scoring_id(varequal),
            response_type: cardinality,
            value,
            case_sensitive: super::case_sensitive(varequal),
            parent_identifier: grandparent_ident(varequal),
        });
    }
    (answers, scoring)
}

fn scoring_id(node: Node) -> String {
    node.attribute("respident")
        .or_else(|| node.attribute("ident"))
        .unwrap_or_default()
        .to_string()
}

fn grandparent_ident(node: Node) -> Option<String> {
    node.parent()
        .and_then(|p| p.parent())
        .and_then(|gp| gp.attribute("ident"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::v1::interactions::classify;
    use roxmltree::Document;

    const SINGLE_BLANK: &str = r#"
        <item ident="fib1" title="Capital">
          <presentation>
            <material><mattext>Type the capital of France:</mattext></material>
            <response_str ident="response1" rcardinality="Single">
              <render_fib><response_label ident="answer1"/></render_fib>
            </response_str>
          </presentation>
          <resprocessing>
            <respcondition>
              <conditionvar><varequal respident="response1" case="Yes">Paris</varequal></conditionvar>
            </respcondition>
            <respcondition>
              <conditionvar><varequal respident="response1">paris</varequal></conditionvar>
            </respcondition>
          </resprocessing>
        </item>"#;

    const MULTI_BLANK: &str = r#"
        <item ident="fib2" title="Colors">
          <itemmetadata>
            <qtimetadata>
              <qtimetadatafield>
                <fieldlabel>question_type</fieldlabel>
                <fieldentry>fill_in_multiple_blanks_question</fieldentry>
              </qtimetadatafield>
            </qtimetadata>
          </itemmetadata>
          <presentation>
            <material><mattext>Roses are [color1], violets are [color2]</mattext></material>
            <response_lid ident="response_color1">
              <material><mattext>color1</mattext></material>
              <render_choice>
                <response_label ident="537"><material><mattext>red</mattext></material></response_label>
              </render_choice>
            </response_lid>
            <response_lid ident="response_color2">
              <material><mattext>color2</mattext></material>
              <render_choice>
                <response_label ident="680"><material><mattext>blue</mattext></material></response_label>
              </render_choice>
            </response_lid>
          </presentation>
        </item>"#;

    fn classify_str(xml: &str) -> Interaction {
        let doc = Document::parse(xml).unwrap();
        let source = Source::from_string(xml).unwrap();
        classify(doc.root_element(), &source).unwrap()
    }

    #[test]
    fn test_single_blank_stems_and_scoring() {
        let interaction = classify_str(SINGLE_BLANK);
        let Interaction::FillBlank(fib) = &interaction else {
            panic!("expected fill blank");
        };
        assert!(!fib.multi_blank);
        assert_eq!(
            fib.stem_items,
            vec![
                StemItem::Text {
                    id: "stem_0".into(),
                    position: 1,
                    value: "Type the capital of France:".into(),
                },
                StemItem::Blank {
                    id: "stem_1".into(),
                    position: 2,
                    blank_id: "response1".into(),
                },
            ]
        );
        assert_eq!(fib.blanks, vec!["response1".to_string()]);

        let scoring = &fib.scoring_data;
        assert_eq!(scoring.len(), 2);
        assert_eq!(scoring[0].value, "Paris");
        assert!(scoring[0].case_sensitive);
        assert_eq!(scoring[1].value, "paris");
        assert!(!scoring[1].case_sensitive);
        assert!(scoring
            .iter()
            .all(|s| s.id == "response1" && s.response_type == ResponseType::Single));
    }

    #[test]
    fn test_multi_blank_stems_link_blanks_to_dropdowns() {
        let interaction = classify_str(MULTI_BLANK);
        let Interaction::FillBlank(fib) = &interaction else {
            panic!("expected fill blank");
        };
        assert!(fib.multi_blank);
        let blank_ids: Vec<&str> = fib
            .stem_items
            .iter()
            .filter_map(|s| match s {
                StemItem::Blank { blank_id, .. } => Some(blank_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(blank_ids, vec!["response_color1", "response_color2"]);
    }

    #[test]
    fn test_multi_blank_scoring_links_parents() {
        let interaction = classify_str(MULTI_BLANK);
        let scoring = interaction.scoring_data();
        assert_eq!(scoring.len(), 2);
        assert_eq!(scoring[0].id, "537");
        assert_eq!(scoring[0].value, "red");
        assert_eq!(
            scoring[0].parent_identifier.as_deref(),
            Some("response_color1")
        );
        assert_eq!(
            scoring[1].parent_identifier.as_deref(),
            Some("response_color2")
        );
    }

    #[test]
    fn test_declines_on_other_response() {
        let xml = SINGLE_BLANK.replace(
            "<resprocessing>",
            "<resprocessing><respcondition><conditionvar><other/></conditionvar></respcondition>",
        );
        let doc = Document::parse(&xml).unwrap();
        let source = Source::from_string(&xml).unwrap();
        assert!(matches(doc.root_element(), &source).unwrap().is_none());
    }

    #[test]
    fn test_declines_decimal_fibtype() {
        let xml = SINGLE_BLANK.replace("<render_fib>", r#"<render_fib fibtype="Decimal">"#);
        let doc = Document::parse(&xml).unwrap();
        let source = Source::from_string(&xml).unwrap();
        assert!(matches(doc.root_element(), &source).unwrap().is_none());
    }
}
