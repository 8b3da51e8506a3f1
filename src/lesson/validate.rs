//! Loading and checking authored lessons.
//!
//! The engine accepts any step list at `Init`; this module is where hosts
//! catch authoring mistakes before a learner ever sees them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lesson::{
    config::ReviewConfig,
    error::LessonError,
    models::{Step, StepKind},
};

/// An authored lesson document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub steps: Vec<Step>,
}

impl Lesson {
    /// Parse and validate a lesson document.
    pub fn from_json(json: &str, review: &ReviewConfig) -> Result<Lesson, LessonError> {
        let lesson: Lesson = serde_json::from_str(json)?;
        validate_steps(&lesson.steps, review)?;
        debug!(lesson_id = %lesson.id, steps = lesson.steps.len(), "lesson loaded");
        Ok(lesson)
    }
}

/// Check the structural rules the engine relies on plus per-kind sanity.
pub fn validate_steps(steps: &[Step], review: &ReviewConfig) -> Result<(), LessonError> {
    if steps.is_empty() {
        return Err(LessonError::Empty);
    }

    let mut summaries = steps.iter().filter(|s| s.is_summary());
    if let (Some(first), Some(second)) = (summaries.next(), summaries.next()) {
        return Err(LessonError::MultipleSummaries {
            first: first.id.clone(),
            second: second.id.clone(),
        });
    }

    let mut ids = HashSet::new();
    for (idx, step) in steps.iter().enumerate() {
        if !ids.insert(step.id.as_str()) {
            return Err(LessonError::DuplicateStepId(step.id.clone()));
        }
        if !review.id_prefix.is_empty() && step.id.starts_with(&review.id_prefix) {
            return Err(LessonError::ReservedIdPrefix {
                id: step.id.clone(),
                prefix: review.id_prefix.clone(),
            });
        }
        if step.is_summary() && idx + 1 != steps.len() {
            return Err(LessonError::SummaryNotLast(step.id.clone()));
        }
        validate_payload(step)?;
    }
    Ok(())
}

fn validate_payload(step: &Step) -> Result<(), LessonError> {
    let invalid = |reason: String| LessonError::InvalidPayload {
        step_id: step.id.clone(),
        kind: step.kind.tag(),
        reason,
    };

    match &step.kind {
        StepKind::Info(_) | StepKind::Summary(_) | StepKind::TrueFalse(_) => Ok(()),

        StepKind::SingleChoice(p) => {
            let correct = p.options.iter().filter(|o| o.is_correct).count();
            if correct != 1 {
                return Err(invalid(format!("expected exactly one correct option, found {correct}")));
            }
            unique(p.options.iter().map(|o| o.id.as_str())).map_err(invalid)
        }

        StepKind::MultiChoice(p) => {
            if !p.options.iter().any(|o| o.is_correct) {
                return Err(invalid("no option is flagged correct".to_string()));
            }
            unique(p.options.iter().map(|o| o.id.as_str())).map_err(invalid)
        }

        StepKind::Order(p) => {
            if p.items.is_empty() {
                return Err(invalid("no items".to_string()));
            }
            unique(p.items.iter().map(|i| i.id.as_str())).map_err(invalid)?;
            let mut positions: Vec<u32> = p.items.iter().map(|i| i.correct_order).collect();
            positions.sort_unstable();
            let expected: Vec<u32> = (1..=p.items.len() as u32).collect();
            if positions != expected {
                return Err(invalid(format!(
                    "correctOrder values must be 1..={} without gaps",
                    p.items.len()
                )));
            }
            Ok(())
        }

        StepKind::Match(p) => {
            unique(p.left.iter().map(|i| i.id.as_str())).map_err(invalid)?;
            unique(p.right.iter().map(|i| i.id.as_str())).map_err(invalid)?;
            for pair in &p.correct_pairs {
                if !p.left.iter().any(|l| l.id == pair.left_id) {
                    return Err(invalid(format!("pair refers to unknown left item {}", pair.left_id)));
                }
                if !p.right.iter().any(|r| r.id == pair.right_id) {
                    return Err(invalid(format!("pair refers to unknown right item {}", pair.right_id)));
                }
            }
            for left in &p.left {
                if !p.correct_pairs.iter().any(|pair| pair.left_id == left.id) {
                    return Err(invalid(format!("left item {} has no correct pair", left.id)));
                }
            }
            Ok(())
        }

        StepKind::FillBlanks(p) => {
            if p.blanks.is_empty() {
                return Err(invalid("no blanks".to_string()));
            }
            unique(p.blanks.iter().map(|b| b.id.as_str())).map_err(invalid)?;
            for blank in &p.blanks {
                if !blank.options.iter().any(|o| o.id == blank.correct_option_id) {
                    return Err(invalid(format!(
                        "blank {} has no option {}",
                        blank.id, blank.correct_option_id
                    )));
                }
            }
            Ok(())
        }

        StepKind::ImageChoice(p) => {
            unique(p.images.iter().map(|i| i.id.as_str())).map_err(invalid)?;
            if !p.images.iter().any(|i| i.id == p.correct_image_id) {
                return Err(invalid(format!("no image {}", p.correct_image_id)));
            }
            Ok(())
        }
    }
}

fn unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(format!("duplicate id {id}"));
        }
    }
    Ok(())
}
