//! Choice interaction (QTI 2.x)

use roxmltree::Node;

use crate::errors::Result;
use crate::models::interaction::{
    AnswerChoice, ChoiceInteraction, Interaction, ResponseType, ScoringData,
};
use crate::models::source::Source;
use crate::sanitize;
use crate::xmlutil;

/// Matches exactly one `choiceInteraction`.
pub(crate) fn matches(item: Node, source: &Source) -> Result<Option<Interaction>> {
    let found = xmlutil::descendants(item, "choiceInteraction");
    if found.len() != 1 {
        return Ok(None);
    }
    let node = found[0];

    let shuffled = node
        .attribute("shuffle")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let answers = xmlutil::descendants(node, "simpleChoice")
        .into_iter()
        .map(|choice| {
            Ok(AnswerChoice {
                ident: choice.attribute("identifier").unwrap_or_default().to_string(),
                body: sanitize::sanitize_children(choice, source, true)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let response_id = node.attribute("responseIdentifier").unwrap_or_default();
    Ok(Some(Interaction::Choice(ChoiceInteraction {
        shuffled,
        answers,
        scoring_data: scoring_data(item, response_id),
    })))
}

/// One record per declared correct value.
fn scoring_data(item: Node, response_id: &str) -> Vec<ScoringData> {
    let Some(declaration) = xmlutil::descendants(item, "responseDeclaration")
        .into_iter()
        .find(|d| d.attribute("identifier") == Some(response_id))
    else {
        return Vec::new();
    };
    let Some(correct) = xmlutil::descendant(declaration, "correctResponse") else {
        return Vec::new();
    };
    xmlutil::descendants(correct, "value")
        .into_iter()
        .map(|value| ScoringData {
            id: response_id.to_string(),
            response_type: ResponseType::ExactResponse,
            value: xmlutil::squish(&xmlutil::collect_text(value)),
            case_sensitive: false,
            parent_identifier: None,
        })
        .collect()
}
