//! Per-step interaction state on the presentation side.
//!
//! A [`StepAttempt`] lives exactly as long as its step is on screen. It turns
//! learner input into candidate [`Answer`]s, evaluates them, and emits an
//! [`AttemptEvent`] only when the outcome changes, so the answer channel sees
//! one event per distinct answer. The feedback cue guard is per attempt, never
//! shared between steps.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::lesson::{
    error::EvaluationError,
    evaluator::evaluate,
    models::{Answer, Step, StepKind, StepOutcome},
};

/// One learner interaction with the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    /// single-choice
    SelectOption(String),
    /// multi-choice; selecting twice deselects
    ToggleOption(String),
    /// true-false
    ChooseBool(bool),
    /// order: append an item to the learner's sequence
    PlaceItem(String),
    /// order: take an item back out of the sequence
    RemoveItem(String),
    /// order: replace the whole sequence (drag and drop)
    Reorder(Vec<String>),
    /// match: pair a left item with a right item, replacing any earlier pair
    Pair { left: String, right: String },
    Unpair(String),
    FillBlank { blank: String, option: String },
    ClearBlank(String),
    /// image-choice
    ChooseImage(String),
}

/// Audible/visual feedback requested on completion. Side channel only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCue {
    Correct,
    Incorrect,
    /// Completion without correctness (info, summary).
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptEvent {
    pub outcome: StepOutcome,
    pub cue: Option<FeedbackCue>,
}

#[derive(Debug, Clone)]
pub struct StepAttempt {
    step: Step,
    layout: Option<Vec<String>>,
    prior: Option<Answer>,
    draft: Option<Answer>,
    last_emitted: Option<StepOutcome>,
    cue_played: bool,
}

impl StepAttempt {
    pub fn new(step: Step) -> Self {
        StepAttempt {
            step,
            layout: None,
            prior: None,
            draft: None,
            last_emitted: None,
            cue_played: false,
        }
    }

    /// Display order of the shuffled column, if this kind has one.
    pub fn with_layout(mut self, layout: Option<Vec<String>>) -> Self {
        self.layout = layout;
        self
    }

    /// Attach the learner's earlier answer (review steps). It is available for
    /// display through [`StepAttempt::prior`] and never counts as an answer.
    pub fn with_prior(mut self, answer_data: Option<&Value>) -> Self {
        self.prior = answer_data.and_then(Answer::from_data);
        self
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn layout(&self) -> Option<&[String]> {
        self.layout.as_deref()
    }

    pub fn prior(&self) -> Option<&Answer> {
        self.prior.as_ref()
    }

    pub fn draft(&self) -> Option<&Answer> {
        self.draft.as_ref()
    }

    /// Called once when the step is shown. Info and summary steps complete
    /// immediately; every other kind waits for input.
    pub fn mount(&mut self) -> Option<AttemptEvent> {
        match self.step.kind {
            StepKind::Info(_) | StepKind::Summary(_) => {
                let outcome = StepOutcome::completed(None, &Answer::Acknowledge);
                self.draft = Some(Answer::Acknowledge);
                self.emit(outcome)
            }
            _ => None,
        }
    }

    /// Apply one interaction. Returns the event to report upward, or `None`
    /// if the outcome is unchanged since the last report.
    pub fn input(&mut self, input: StepInput) -> Result<Option<AttemptEvent>, EvaluationError> {
        let candidate = self.next_answer(input);
        let outcome = evaluate(&self.step.kind, &candidate)?;
        self.draft = Some(candidate);
        Ok(self.emit(outcome))
    }

    fn next_answer(&self, input: StepInput) -> Answer {
        match input {
            StepInput::SelectOption(option_id) => Answer::SingleChoice { option_id },
            StepInput::ChooseBool(value) => Answer::TrueFalse { value },
            StepInput::ChooseImage(image_id) => Answer::ImageChoice { image_id },

            StepInput::ToggleOption(id) => {
                let mut option_ids = match &self.draft {
                    Some(Answer::MultiChoice { option_ids }) => option_ids.clone(),
                    _ => BTreeSet::new(),
                };
                if !option_ids.remove(&id) {
                    option_ids.insert(id);
                }
                Answer::MultiChoice { option_ids }
            }

            StepInput::PlaceItem(id) => {
                let mut item_ids = self.draft_order();
                if !item_ids.contains(&id) {
                    item_ids.push(id);
                }
                Answer::Order { item_ids }
            }
            StepInput::RemoveItem(id) => {
                let mut item_ids = self.draft_order();
                item_ids.retain(|i| *i != id);
                Answer::Order { item_ids }
            }
            StepInput::Reorder(item_ids) => Answer::Order { item_ids },

            StepInput::Pair { left, right } => {
                let mut pairs = self.draft_pairs();
                // A right item belongs to at most one left item.
                pairs.retain(|_, r| *r != right);
                pairs.insert(left, right);
                Answer::Match { pairs }
            }
            StepInput::Unpair(left) => {
                let mut pairs = self.draft_pairs();
                pairs.remove(&left);
                Answer::Match { pairs }
            }

            StepInput::FillBlank { blank, option } => {
                let mut choices = self.draft_choices();
                choices.insert(blank, option);
                Answer::FillBlanks { choices }
            }
            StepInput::ClearBlank(blank) => {
                let mut choices = self.draft_choices();
                choices.remove(&blank);
                Answer::FillBlanks { choices }
            }
        }
    }

    fn draft_order(&self) -> Vec<String> {
        match &self.draft {
            Some(Answer::Order { item_ids }) => item_ids.clone(),
            _ => Vec::new(),
        }
    }

    fn draft_pairs(&self) -> BTreeMap<String, String> {
        match &self.draft {
            Some(Answer::Match { pairs }) => pairs.clone(),
            _ => BTreeMap::new(),
        }
    }

    fn draft_choices(&self) -> BTreeMap<String, String> {
        match &self.draft {
            Some(Answer::FillBlanks { choices }) => choices.clone(),
            _ => BTreeMap::new(),
        }
    }

    fn emit(&mut self, outcome: StepOutcome) -> Option<AttemptEvent> {
        if self.last_emitted.as_ref() == Some(&outcome) {
            return None;
        }
        let cue = if outcome.is_completed && !self.cue_played {
            self.cue_played = true;
            Some(match outcome.is_correct {
                Some(true) => FeedbackCue::Correct,
                Some(false) => FeedbackCue::Incorrect,
                None => FeedbackCue::Done,
            })
        } else {
            None
        };
        self.last_emitted = Some(outcome.clone());
        Some(AttemptEvent { outcome, cue })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::helpers::*;

    fn fill(blank: &str, option: &str) -> StepInput {
        StepInput::FillBlank { blank: blank.into(), option: option.into() }
    }

    #[test]
    fn fill_blanks_reports_completion_only_when_all_filled() {
        let mut a = StepAttempt::new(fill_blanks("fb", "{{b1}} {{b2}}", &[("b1", "x"), ("b2", "y")], &["x", "y"]));
        assert_eq!(a.mount(), None);

        let first = a.input(fill("b1", "x")).unwrap().unwrap();
        assert!(!first.outcome.is_completed);
        assert_eq!(first.cue, None);

        let second = a.input(fill("b2", "y")).unwrap().unwrap();
        assert!(second.outcome.is_completed);
        assert_eq!(second.outcome.is_correct, Some(true));
        assert_eq!(second.cue, Some(FeedbackCue::Correct));
    }

    #[test]
    fn unchanged_outcome_is_not_re_emitted() {
        let mut a = StepAttempt::new(single_choice("q", "?", &[("a", "A"), ("b", "B")], "a"));
        assert!(a.input(StepInput::SelectOption("a".into())).unwrap().is_some());
        assert!(a.input(StepInput::SelectOption("a".into())).unwrap().is_none());

        let changed = a.input(StepInput::SelectOption("b".into())).unwrap().unwrap();
        assert_eq!(changed.outcome.is_correct, Some(false));
        assert_eq!(changed.cue, None, "cue plays once per step instance");
    }

    #[test]
    fn multi_choice_toggles_and_reopens() {
        let mut a = StepAttempt::new(multi_choice("m", "?", &[("a", "A"), ("b", "B")], &["a"]));
        let on = a.input(StepInput::ToggleOption("a".into())).unwrap().unwrap();
        assert!(on.outcome.is_completed);
        let off = a.input(StepInput::ToggleOption("a".into())).unwrap().unwrap();
        assert!(!off.outcome.is_completed, "empty selection is incomplete again");
    }

    #[test]
    fn order_builds_sequence_item_by_item() {
        let mut a = StepAttempt::new(order("o", "?", &[("x", 1), ("y", 2)]));
        let first = a.input(StepInput::PlaceItem("y".into())).unwrap().unwrap();
        assert!(!first.outcome.is_completed);
        let done = a.input(StepInput::PlaceItem("x".into())).unwrap().unwrap();
        assert_eq!(done.outcome.is_correct, Some(false));

        a.input(StepInput::Reorder(vec!["x".into(), "y".into()])).unwrap();
        assert_eq!(
            a.draft(),
            Some(&Answer::Order { item_ids: vec!["x".into(), "y".into()] })
        );
    }

    #[test]
    fn match_pairing_moves_right_item() {
        let mut a = StepAttempt::new(matching("m", "?", &[("l1", "r1"), ("l2", "r2")]));
        let pair = |l: &str, r: &str| StepInput::Pair { left: l.into(), right: r.into() };

        let first = a.input(pair("l1", "r2")).unwrap().unwrap();
        assert!(!first.outcome.is_completed);

        // Still incomplete (l1 lost its pair), so nothing new to report.
        assert_eq!(a.input(pair("l2", "r2")).unwrap(), None);
        let expected: BTreeMap<String, String> = [("l2".to_string(), "r2".to_string())].into_iter().collect();
        assert_eq!(a.draft(), Some(&Answer::Match { pairs: expected }));

        let done = a.input(pair("l1", "r1")).unwrap().unwrap();
        assert_eq!(done.outcome.is_correct, Some(true));
    }

    #[test]
    fn info_completes_on_mount_once() {
        let mut a = StepAttempt::new(info("i", "Hello"));
        let ev = a.mount().unwrap();
        assert!(ev.outcome.is_completed);
        assert_eq!(ev.cue, Some(FeedbackCue::Done));
        assert_eq!(a.mount(), None);
    }

    #[test]
    fn prior_answer_is_displayed_but_not_submitted() {
        let prior = Answer::SingleChoice { option_id: "b".into() }.to_data();
        let mut a = StepAttempt::new(single_choice("q", "?", &[("a", "A"), ("b", "B")], "a"))
            .with_prior(Some(&prior));
        assert_eq!(a.prior(), Some(&Answer::SingleChoice { option_id: "b".into() }));
        assert_eq!(a.draft(), None);
        assert_eq!(a.mount(), None);
    }

    #[test]
    fn wrong_input_for_kind_is_an_error() {
        let mut a = StepAttempt::new(true_false("t", "?", true));
        assert!(a.input(StepInput::ChooseImage("x".into())).is_err());
        assert_eq!(a.draft(), None);
    }
}
