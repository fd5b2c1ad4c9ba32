//! Gap match interaction (QTI 2.x)
//!
//! Choices (`gapText`) are dragged into gaps embedded in the prompt
//! paragraphs. Correct responses are declared as `"choiceId gapId"` pairs;
//! scoring stores the reverse mapping so each gap resolves to the text of
//! its matched choice.

use std::collections::HashMap;

use roxmltree::Node;

use crate::errors::Result;
use crate::models::interaction::{
    AnswerChoice, GapMatchInteraction, Interaction, ResponseType, ScoringData, StemItem,
};
use crate::models::source::Source;
use crate::xmlutil;

/// Matches exactly one `gapMatchInteraction`; zero or several decline.
pub(crate) fn matches(item: Node, _source: &Source) -> Result<Option<Interaction>> {
    let found = xmlutil::descendants(item, "gapMatchInteraction");
    if found.len() != 1 {
        return Ok(None);
    }
    let gap_match = found[0];

    let shuffled = gap_match
        .attribute("shuffle")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let choices: Vec<(String, String)> = xmlutil::descendants(gap_match, "gapText")
        .into_iter()
        .map(|choice| {
            (
                choice.attribute("identifier").unwrap_or_default().to_string(),
                xmlutil::collect_text(choice).trim().to_string(),
            )
        })
        .collect();

    let answers = choices
        .iter()
        .map(|(ident, body)| AnswerChoice {
            ident: ident.clone(),
            body: body.clone(),
        })
        .collect();
    let blanks = choices.iter().map(|(ident, _)| ident.clone()).collect();

    Ok(Some(Interaction::GapMatch(GapMatchInteraction {
        shuffled,
        stem_items: stem_items(gap_match),
        blanks,
        answers,
        scoring_data: scoring_data(item, gap_match, &choices),
    })))
}

/// The prompt (when present) followed by the paragraph runs, gaps becoming
/// blank placeholders.
fn stem_items(gap_match: Node) -> Vec<StemItem> {
    let mut items = Vec::new();
    let mut index = 0;

    if let Some(prompt) = xmlutil::child(gap_match, "prompt") {
        push_text(&mut items, &mut index, xmlutil::collect_text(prompt));
    }

    for paragraph in xmlutil::descendants(gap_match, "p") {
        for child in paragraph.children() {
            if child.is_element() && child.tag_name().name() == "gap" {
                items.push(StemItem::Blank {
                    id: format!("stem_{index}"),
                    position: index + 1,
                    blank_id: child.attribute("identifier").unwrap_or_default().to_string(),
                });
                index += 1;
            } else {
                let text = if child.is_element() {
                    xmlutil::collect_text(child)
                } else {
                    child.text().unwrap_or_default().to_string()
                };
                let value = if text.is_empty() { " ".to_string() } else { text };
                push_text(&mut items, &mut index, value);
            }
        }
    }
    items
}

fn push_text(items: &mut Vec<StemItem>, index: &mut usize, value: String) {
    items.push(StemItem::Text {
        id: format!("stem_{index}"),
        position: *index + 1,
        value,
    });
    *index += 1;
}

fn scoring_data(item: Node, gap_match: Node, choices: &[(String, String)]) -> Vec<ScoringData> {
    // declared as "choiceId gapId", stored reversed as gap -> choice
    let mut mapping: HashMap<String, String> = HashMap::new();
    for correct in xmlutil::descendants(item, "correctResponse") {
        for value in xmlutil::descendants(correct, "value") {
            let text = xmlutil::collect_text(value);
            let mut parts = text.split_whitespace();
            if let (Some(choice_id), Some(gap_id)) = (parts.next(), parts.next()) {
                mapping.insert(gap_id.to_string(), choice_id.to_string());
            }
        }
    }

    xmlutil::descendants(gap_match, "gap")
        .into_iter()
        .filter_map(|gap| {
            let gap_id = gap.attribute("identifier")?;
            let choice_id = mapping.get(gap_id)?;
            let (_, choice_text) = choices.iter().find(|(ident, _)| ident == choice_id)?;
            Some(ScoringData {
                id: gap_id.to_string(),
                response_type: ResponseType::DirectedPair,
                value: choice_text.clone(),
                case_sensitive: false,
                parent_identifier: None,
            })
        })
        .collect()
}
