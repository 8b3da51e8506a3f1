//! Error types for the authoring and presentation boundaries.
//!
//! The progression engine itself never fails: invalid actions are no-ops.
//! Errors only arise when loading lesson content or when a presentation
//! component hands an evaluator an answer of the wrong shape.

use thiserror::Error;

/// Problems with an authored lesson document.
#[derive(Error, Debug)]
pub enum LessonError {
    #[error("Failed to parse lesson JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Lesson has no steps")]
    Empty,

    #[error("Duplicate step id: {0}")]
    DuplicateStepId(String),

    #[error("Step id {id} uses the reserved review prefix {prefix:?}")]
    ReservedIdPrefix { id: String, prefix: String },

    #[error("Summary step {0} must be the last step")]
    SummaryNotLast(String),

    #[error("Lesson has more than one summary step ({first}, {second})")]
    MultipleSummaries { first: String, second: String },

    #[error("Invalid {kind} step {step_id}: {reason}")]
    InvalidPayload {
        step_id: String,
        kind: &'static str,
        reason: String,
    },
}

/// An answer that cannot be evaluated against the given step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("A {answer} answer cannot be evaluated against a {step} step")]
    KindMismatch {
        step: &'static str,
        answer: &'static str,
    },
}
