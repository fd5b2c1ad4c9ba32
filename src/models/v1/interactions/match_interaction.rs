//! Match interaction (QTI 1.2)
//!
//! Matching items carry one `response_lid` per source prompt, all sharing a
//! target list. Scoring identifiers arrive as `<prefix>_<slot>` where the
//! slot may be a letter; letters are rewritten through the alphabetic index
//! table so graders see stable numeric slots.

use lazy_static::lazy_static;
use roxmltree::Node;

use crate::errors::Result;
use crate::models::interaction::{
    AnswerChoice, Interaction, MatchInteraction, ResponseType, ScoringData,
};
use crate::models::source::Source;
use crate::models::v1::material_html;
use crate::xmlutil;

lazy_static! {
    /// `0,A,B,…,Z` — a letter's table position is its numeric slot.
    static ref ALPHA_INDEX: Vec<String> = std::iter::once("0".to_string())
        .chain((b'A'..=b'Z').map(|c| (c as char).to_string()))
        .collect();
}

/// Matches an item presenting more than one `response_lid` (the Canvas
/// multi-blank variant is claimed by the fill-blank matcher first).
pub(crate) fn matches(item: Node, source: &Source) -> Result<Option<Interaction>> {
    let lids = xmlutil::descendants(item, "response_lid");
    if lids.len() < 2 {
        return Ok(None);
    }

    let answers = lids
        .into_iter()
        .map(|lid| {
            Ok(AnswerChoice {
                ident: lid.attribute("ident").unwrap_or_default().to_string(),
                body: source.sanitize(&material_html(lid))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(Interaction::Match(MatchInteraction {
        answers,
        scoring_data: scoring_data(item),
    })))
}

fn scoring_data(item: Node) -> Vec<ScoringData> {
    let mut records = Vec::new();
    for processing in xmlutil::descendants(item, "resprocessing") {
        for condition in xmlutil::descendants(processing, "respcondition") {
            let Some(conditionvar) = xmlutil::descendant(condition, "conditionvar") else {
                continue;
            };
            for varequal in xmlutil::descendants(conditionvar, "varequal") {
                let respident = varequal.attribute("respident").unwrap_or_default();
                records.push(ScoringData {
                    id: recombine(respident),
                    response_type: ResponseType::DirectedPair,
                    value: xmlutil::squish(&xmlutil::collect_text(varequal)),
                    case_sensitive: false,
                    parent_identifier: None,
                });
            }
        }
    }
    records
}

/// Rewrite the second `_`-separated segment of a response identifier
/// through the alphabetic index table when it is a letter.
fn recombine(respident: &str) -> String {
    let mut parts: Vec<String> = respident.split('_').map(str::to_string).collect();
    if parts.len() > 1 {
        if let Some(index) = ALPHA_INDEX.iter().position(|entry| *entry == parts[1]) {
            parts[1] = index.to_string();
        }
    }
    parts.join("_")
}
