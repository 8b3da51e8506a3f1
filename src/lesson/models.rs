use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Kind payloads
// ---------------------------------------------------------------------------

/// One selectable option of a single- or multi-choice step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoicePayload {
    pub prompt: String,
    pub options: Vec<ChoiceOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueFalsePayload {
    pub statement: String,
    pub correct_answer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub text: String,
    /// 1-based position in the correct sequence.
    pub correct_order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub prompt: String,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchItem {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair {
    pub left_id: String,
    pub right_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPayload {
    pub prompt: String,
    pub left: Vec<MatchItem>,
    pub right: Vec<MatchItem>,
    pub correct_pairs: Vec<MatchPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlankOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blank {
    pub id: String,
    pub options: Vec<BlankOption>,
    pub correct_option_id: String,
}

/// `text` marks blanks as `{{blank_id}}`; the marker syntax is a rendering
/// concern and is not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlanksPayload {
    pub text: String,
    pub blanks: Vec<Blank>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOption {
    pub id: String,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageChoicePayload {
    pub prompt: String,
    pub images: Vec<ImageOption>,
    pub correct_image_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

// ---------------------------------------------------------------------------
// Step kinds
// ---------------------------------------------------------------------------

/// The closed set of step kinds, tagged by `stepKind` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stepKind", rename_all = "kebab-case")]
pub enum StepKind {
    Info(ContentPayload),
    SingleChoice(ChoicePayload),
    MultiChoice(ChoicePayload),
    TrueFalse(TrueFalsePayload),
    Order(OrderPayload),
    Match(MatchPayload),
    FillBlanks(FillBlanksPayload),
    ImageChoice(ImageChoicePayload),
    Summary(ContentPayload),
}

impl StepKind {
    /// Wire tag of this kind (e.g. `"fill-blanks"`).
    pub fn tag(&self) -> &'static str {
        match self {
            StepKind::Info(_) => "info",
            StepKind::SingleChoice(_) => "single-choice",
            StepKind::MultiChoice(_) => "multi-choice",
            StepKind::TrueFalse(_) => "true-false",
            StepKind::Order(_) => "order",
            StepKind::Match(_) => "match",
            StepKind::FillBlanks(_) => "fill-blanks",
            StepKind::ImageChoice(_) => "image-choice",
            StepKind::Summary(_) => "summary",
        }
    }

    /// Does this kind have a right or wrong answer at all?
    pub fn is_gradable(&self) -> bool {
        !matches!(self, StepKind::Info(_) | StepKind::Summary(_))
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, StepKind::Summary(_))
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// One authored (or synthesized review) unit of lesson content.
///
/// The engine only ever reads the shared base fields; the kind payload is
/// opaque to it and belongs to the evaluators and the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit author override. `None` falls back to the kind's gradability.
    #[serde(default, rename = "isAssessment", skip_serializing_if = "Option::is_none")]
    pub assessment: Option<bool>,
    #[serde(default = "default_true")]
    pub record_incorrect: bool,
    /// Set only on synthesized review steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_source_step_id: Option<String>,
    #[serde(flatten)]
    pub kind: StepKind,
}

impl Step {
    pub fn new(id: impl Into<String>, kind: StepKind) -> Self {
        Step {
            id: id.into(),
            title: None,
            description: None,
            assessment: None,
            record_incorrect: true,
            review_source_step_id: None,
            kind,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_assessment(mut self, assessment: bool) -> Self {
        self.assessment = Some(assessment);
        self
    }

    pub fn with_record_incorrect(mut self, record: bool) -> Self {
        self.record_incorrect = record;
        self
    }

    /// Does this step count toward mastery tracking?
    pub fn is_assessment(&self) -> bool {
        self.assessment.unwrap_or_else(|| self.kind.is_gradable())
    }

    pub fn is_review(&self) -> bool {
        self.review_source_step_id.is_some()
    }

    pub fn is_summary(&self) -> bool {
        self.kind.is_summary()
    }
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// What the engine records for a step. `answer_data` is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub step_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_data: Option<Value>,
}

/// Typed answer shape per kind, used on the presentation side of the
/// `answer_data` boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Answer {
    SingleChoice {
        #[serde(rename = "optionId")]
        option_id: String,
    },
    MultiChoice {
        #[serde(rename = "optionIds")]
        option_ids: BTreeSet<String>,
    },
    TrueFalse {
        value: bool,
    },
    Order {
        #[serde(rename = "itemIds")]
        item_ids: Vec<String>,
    },
    /// Left item id to right item id.
    Match {
        pairs: BTreeMap<String, String>,
    },
    /// Blank id to chosen option id.
    FillBlanks {
        choices: BTreeMap<String, String>,
    },
    ImageChoice {
        #[serde(rename = "imageId")]
        image_id: String,
    },
    /// Info and summary steps: the learner has seen the content.
    Acknowledge,
}

impl Answer {
    /// Encode as the opaque blob stored in [`AnswerResult::answer_data`].
    pub fn to_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Decode a previously recorded blob; `None` if it is not an `Answer`.
    pub fn from_data(data: &Value) -> Option<Answer> {
        serde_json::from_value(data.clone()).ok()
    }

    pub fn kind_tag(&self) -> &'static str {
        match self {
            Answer::SingleChoice { .. } => "single-choice",
            Answer::MultiChoice { .. } => "multi-choice",
            Answer::TrueFalse { .. } => "true-false",
            Answer::Order { .. } => "order",
            Answer::Match { .. } => "match",
            Answer::FillBlanks { .. } => "fill-blanks",
            Answer::ImageChoice { .. } => "image-choice",
            Answer::Acknowledge => "acknowledge",
        }
    }
}

/// Result of evaluating one answer against its step, as reported upward
/// through the answer channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_data: Option<Value>,
}

impl StepOutcome {
    pub fn incomplete() -> Self {
        StepOutcome { is_completed: false, is_correct: None, answer_data: None }
    }

    pub fn completed(is_correct: Option<bool>, answer: &Answer) -> Self {
        StepOutcome {
            is_completed: true,
            is_correct,
            answer_data: Some(answer.to_data()),
        }
    }
}
