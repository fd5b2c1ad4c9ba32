//! QTI 2.x item model

use std::path::Path;

use roxmltree::{Document, Node};

use crate::errors::{ImportError, Result};
use crate::models::interaction::{Interaction, ScoringData};
use crate::models::source::Source;
use crate::models::v2::interactions;
use crate::sanitize;
use crate::xmlutil;

#[derive(Debug, Clone)]
pub struct AssessmentItem {
    identifier: String,
    title: String,
    points_possible: f64,
    body: String,
    interaction: Interaction,
}

impl AssessmentItem {
    pub fn from_path(path: &Path, package_root: Option<&Path>) -> Result<Self> {
        let source = Source::from_path(path, package_root)?;
        let doc = Document::parse(source.content())?;
        let root = doc.root_element();

        let identifier = root
            .attribute("identifier")
            .ok_or_else(|| {
                ImportError::Parse("assessment item is missing an identifier attribute".into())
            })?
            .to_string();
        let title = root.attribute("title").unwrap_or_default().to_string();
        let body_node = xmlutil::child(root, "itemBody")
            .ok_or_else(|| ImportError::Parse("assessment item has no itemBody".into()))?;
        let body = sanitize::sanitize_children(body_node, &source, true)?;
        let interaction = interactions::classify(root, &source)?;
        Ok(Self {
            identifier,
            title,
            points_possible: points_possible(root),
            body,
            interaction,
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

    /// The sanitized item body.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn scoring_data(&self) -> &[ScoringData] {
        self.interaction.scoring_data()
    }
}

/// Points come from the first numeric outcome declaration: its declared
/// maximum, then its default value, then zero.
fn points_possible(root: Node) -> f64 {
    let Some(outcome) = root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "outcomeDeclaration")
        .find(|n| matches!(n.attribute("baseType"), Some("float") | Some("integer")))
    else {
        return 0.0;
    };
    if let Some(max) = outcome
        .attribute("normalMaximum")
        .and_then(|v| v.trim().parse().ok())
    {
        return max;
    }
    xmlutil::descendant(outcome, "value")
        .map(xmlutil::collect_text)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0)
}
