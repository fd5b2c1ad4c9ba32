//! Numeric interaction (QTI 1.2)
//!
//! Accepts the decimal fill-in markup the fill-blank matcher declines. Only
//! exact matches produce scoring records: a condition has to provide the
//! equality value and both bounds, all agreeing.

use roxmltree::Node;

use crate::errors::Result;
use crate::models::interaction::{Interaction, NumericInteraction, ResponseType, ScoringData};
use crate::models::source::Source;
use crate::xmlutil;

pub(crate) fn matches(item: Node, _source: &Source) -> Result<Option<Interaction>> {
    let Some(render) = xmlutil::descendant(item, "render_fib") else {
        return Ok(None);
    };
    if render.attribute("fibtype") != Some("Decimal") {
        return Ok(None);
    }
    Ok(Some(Interaction::Numeric(NumericInteraction {
        scoring_data: scoring_data(item),
    })))
}

fn scoring_data(item: Node) -> Vec<ScoringData> {
    let mut records = Vec::new();
    for conditionvar in xmlutil::descendants(item, "conditionvar") {
        let equal = xmlutil::descendant(conditionvar, "varequal");
        let gte = xmlutil::descendant(conditionvar, "vargte");
        let lte = xmlutil::descendant(conditionvar, "varlte");
        let (Some(equal), Some(gte), Some(lte)) = (equal, gte, lte) else {
            continue;
        };
        let value = xmlutil::collect_text(equal).trim().to_string();
        if xmlutil::collect_text(gte).trim() != value || xmlutil::collect_text(lte).trim() != value
        {
            continue;
        }
        records.push(ScoringData {
            id: equal.attribute("respident").unwrap_or_default().to_string(),
            response_type: ResponseType::ExactResponse,
            value,
            case_sensitive: false,
            parent_identifier: None,
        });
    }
    records
}
