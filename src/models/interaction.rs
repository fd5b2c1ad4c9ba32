//! Version-independent interaction model
//!
//! The normalized output surface of the pipeline: one `Interaction` per
//! item, carrying ordered stem items, answer choices and scoring records.
//! Both schema generations classify into this one model; external renderer
//! and grader collaborators consume it, so everything here serializes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The response type recorded on a scoring entry. `exactResponse` and
/// `directedPair` are the normalized wire names; the bare cardinality
/// values appear verbatim on fill-blank records, which carry the
/// interaction's declared `rcardinality` as their type.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseType {
    #[serde(rename = "exactResponse")]
    ExactResponse,
    #[serde(rename = "directedPair")]
    DirectedPair,
    Single,
    Multiple,
    Ordered,
}

impl ResponseType {
    /// Map a QTI 1.2 `rcardinality` value; anything missing or unknown is
    /// treated as `Single`.
    pub fn from_rcardinality(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("multiple") => ResponseType::Multiple,
            Some(v) if v.eq_ignore_ascii_case("ordered") => ResponseType::Ordered,
            _ => ResponseType::Single,
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseType::ExactResponse => "exactResponse",
            ResponseType::DirectedPair => "directedPair",
            ResponseType::Single => "Single",
            ResponseType::Multiple => "Multiple",
            ResponseType::Ordered => "Ordered",
        };
        write!(f, "{name}")
    }
}

/// One normalized correct-answer record; one per gradable response unit.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoringData {
    pub id: String,
    pub response_type: ResponseType,
    pub value: String,
    pub case_sensitive: bool,
    pub parent_identifier: Option<String>,
}

/// One ordered fragment of an interaction's displayed prompt.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StemItem {
    Text {
        id: String,
        position: usize,
        value: String,
    },
    Blank {
        id: String,
        position: usize,
        blank_id: String,
    },
}

/// One selectable answer, body sanitized.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnswerChoice {
    pub ident: String,
    pub body: String,
}

/// Discriminant tag for the classified interaction.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Choice,
    Match,
    FillBlank,
    GapMatch,
    ExtendedText,
    Text,
    Numeric,
}

/// Multiple/single choice.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChoiceInteraction {
    pub shuffled: bool,
    pub answers: Vec<AnswerChoice>,
    pub scoring_data: Vec<ScoringData>,
}

/// Source-to-target matching.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MatchInteraction {
    pub answers: Vec<AnswerChoice>,
    pub scoring_data: Vec<ScoringData>,
}

/// Fill in the blank, single or Canvas multi-blank.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FillBlankInteraction {
    pub multi_blank: bool,
    pub stem_items: Vec<StemItem>,
    pub blanks: Vec<String>,
    pub answers: Vec<AnswerChoice>,
    pub scoring_data: Vec<ScoringData>,
}

/// Gap match: drag choices into gaps embedded in the prompt.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GapMatchInteraction {
    pub shuffled: bool,
    pub stem_items: Vec<StemItem>,
    pub blanks: Vec<String>,
    pub answers: Vec<AnswerChoice>,
    pub scoring_data: Vec<ScoringData>,
}

/// Long-form text entry; carries sizing hints, no scoring records.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtendedTextInteraction {
    pub expected_lines: u32,
    pub min_strings: u32,
    pub max_strings: Option<u32>,
}

/// Free text whose "scoring" is literal feedback content rather than
/// structured records.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TextInteraction {
    pub feedback: String,
}

/// Numeric entry; only exact matches produce scoring records.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NumericInteraction {
    pub scoring_data: Vec<ScoringData>,
}

/// The classified interaction of one item.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Interaction {
    Choice(ChoiceInteraction),
    Match(MatchInteraction),
    FillBlank(FillBlankInteraction),
    GapMatch(GapMatchInteraction),
    ExtendedText(ExtendedTextInteraction),
    Text(TextInteraction),
    Numeric(NumericInteraction),
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Interaction::Choice(_) => InteractionKind::Choice,
            Interaction::Match(_) => InteractionKind::Match,
            Interaction::FillBlank(_) => InteractionKind::FillBlank,
            Interaction::GapMatch(_) => InteractionKind::GapMatch,
            Interaction::ExtendedText(_) => InteractionKind::ExtendedText,
            Interaction::Text(_) => InteractionKind::Text,
            Interaction::Numeric(_) => InteractionKind::Numeric,
        }
    }

    pub fn stem_items(&self) -> &[StemItem] {
        match self {
            Interaction::FillBlank(i) => &i.stem_items,
            Interaction::GapMatch(i) => &i.stem_items,
            _ => &[],
        }
    }

    pub fn blanks(&self) -> &[String] {
        match self {
            Interaction::FillBlank(i) => &i.blanks,
            Interaction::GapMatch(i) => &i.blanks,
            _ => &[],
        }
    }

    pub fn answers(&self) -> &[AnswerChoice] {
        match self {
            Interaction::Choice(i) => &i.answers,
            Interaction::Match(i) => &i.answers,
            Interaction::FillBlank(i) => &i.answers,
            Interaction::GapMatch(i) => &i.answers,
            _ => &[],
        }
    }

    pub fn scoring_data(&self) -> &[ScoringData] {
        match self {
            Interaction::Choice(i) => &i.scoring_data,
            Interaction::Match(i) => &i.scoring_data,
            Interaction::FillBlank(i) => &i.scoring_data,
            Interaction::GapMatch(i) => &i.scoring_data,
            Interaction::Numeric(i) => &i.scoring_data,
            Interaction::ExtendedText(_) | Interaction::Text(_) => &[],
        }
    }
}
