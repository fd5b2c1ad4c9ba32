//! Choice interaction (QTI 1.2)

use roxmltree::Node;

use crate::errors::Result;
use crate::models::interaction::{
    AnswerChoice, ChoiceInteraction, Interaction, ResponseType, ScoringData,
};
use crate::models::source::Source;
use crate::models::v1::material_html;
use crate::xmlutil;

/// Matches an item with exactly one `response_lid` rendered as a choice
/// list.
pub(crate) fn matches(item: Node, source: &Source) -> Result<Option<Interaction>> {
    let lids = xmlutil::descendants(item, "response_lid");
    if lids.len() != 1 {
        return Ok(None);
    }
    let Some(render) = xmlutil::descendant(lids[0], "render_choice") else {
        return Ok(None);
    };

    let shuffled = render
        .attribute("shuffle")
        .map(|v| v.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false);

    let answers = xmlutil::descendants(render, "response_label")
        .into_iter()
        .map(|label| {
            Ok(AnswerChoice {
                ident: label.attribute("ident").unwrap_or_default().to_string(),
                body: source.sanitize(&material_html(label))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(Interaction::Choice(ChoiceInteraction {
        shuffled,
        answers,
        scoring_data: scoring_data(item),
    })))
}

/// One record per correct value under the single condition's variable
/// equality check.
fn scoring_data(item: Node) -> Vec<ScoringData> {
    let Some(condition) = xmlutil::descendants(item, "respcondition")
        .into_iter()
        .find(|cond| {
            xmlutil::descendant(*cond, "conditionvar")
                .map(|var| xmlutil::descendant(var, "varequal").is_some())
                .unwrap_or(false)
        })
    else {
        return Vec::new();
    };
    let Some(conditionvar) = xmlutil::descendant(condition, "conditionvar") else {
        return Vec::new();
    };
    xmlutil::descendants(conditionvar, "varequal")
        .into_iter()
        .map(|varequal| ScoringData {
            id: varequal.attribute("respident").unwrap_or_default().to_string(),
            response_type: ResponseType::ExactResponse,
            value: xmlutil::squish(&xmlutil::collect_text(varequal)),
            case_sensitive: super::case_sensitive(varequal),
            parent_identifier: None,
        })
        .collect()
}
