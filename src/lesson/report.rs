use serde::{Deserialize, Serialize};

use crate::lesson::engine::LessonState;

/// Outcome of a lesson, handed to the completion callback and available to
/// the summary step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonReport {
    /// Authored steps that count toward mastery.
    pub assessed_steps: usize,
    /// Assessed steps answered correctly without ever being missed.
    pub first_pass_correct: usize,
    /// Original ids missed on first attempt, in miss order.
    pub missed_step_ids: Vec<String>,
    pub review_steps: usize,
    pub review_correct: usize,
}

impl LessonReport {
    /// Share of assessed steps right on the first pass; 1.0 when nothing was
    /// assessed.
    pub fn mastery(&self) -> f32 {
        if self.assessed_steps == 0 {
            return 1.0;
        }
        self.first_pass_correct as f32 / self.assessed_steps as f32
    }
}

pub fn report(state: &LessonState) -> LessonReport {
    let answered_correctly = |id: &str| {
        state
            .answer_for(id)
            .and_then(|a| a.is_correct)
            .unwrap_or(false)
    };

    let assessed: Vec<&str> = state
        .original_steps()
        .iter()
        .filter(|s| s.is_assessment())
        .map(|s| s.id.as_str())
        .collect();

    let first_pass_correct = assessed
        .iter()
        .copied()
        .filter(|id| answered_correctly(*id) && !state.incorrect_steps().iter().any(|m| m == id))
        .count();

    let review: Vec<&str> = state
        .all_steps()
        .iter()
        .filter(|s| s.is_review())
        .map(|s| s.id.as_str())
        .collect();

    LessonReport {
        assessed_steps: assessed.len(),
        first_pass_correct,
        missed_step_ids: state.incorrect_steps().to_vec(),
        review_steps: review.len(),
        review_correct: review.iter().copied().filter(|id| answered_correctly(*id)).count(),
    }
}
