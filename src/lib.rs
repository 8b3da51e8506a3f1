//! # lesson_engine
//!
//! The progression engine behind a course of graded micro-exercises.
//!
//! A lesson is an ordered list of steps (info slides, single/multi choice,
//! true/false, ordering, matching, fill-in-the-blanks, image choice and a
//! closing summary). The engine walks the learner through them, records
//! which assessment steps were missed, injects one review pass of exactly
//! those steps before the summary, and always terminates.
//!
//! ## How it works
//!
//! 1. Load a [`Lesson`] from JSON (or build steps with [`helpers`]).
//! 2. Drive a [`LessonState`] with [`dispatch`]: a pure transition function
//!    followed by the automatic review/summary reconciliation. Invalid actions
//!    leave the state untouched; the engine never fails.
//! 3. Or let a [`LessonShell`] do the hosting: it mounts a [`StepAttempt`] per
//!    step, evaluates learner input, gates the continue button and reports
//!    completion with a [`LessonReport`].
//!
//! ## Key properties
//!
//! - **Terminating**: review is built at most once; misses on review steps are
//!   recorded but never re-reviewed.
//! - **Kind-agnostic engine**: only the shared step fields drive progression;
//!   kind payloads belong to [`evaluate`] and the presentation layer.
//! - **Deterministic**: review ids derive from source ids, and presentation
//!   shuffling is reproducible with a configured seed.
//!
//! ## Quick start
//!
//! ```rust
//! use lesson_engine::{helpers::*, LessonConfig, LessonShell, StepInput};
//!
//! let mut shell = LessonShell::new(LessonConfig::default());
//! shell.load(vec![
//!     single_choice("q1", "Which channel is owned media?", &[("a", "Blog"), ("b", "Banner ad")], "a"),
//!     summary("done"),
//! ]);
//!
//! shell.input(StepInput::SelectOption("b".into())).unwrap(); // wrong
//! shell.press_continue();                                    // enters review
//! assert_eq!(shell.state().current_step().unwrap().id, "review-q1");
//!
//! shell.input(StepInput::SelectOption("a".into())).unwrap();
//! shell.press_continue();                                    // summary
//! shell.press_continue();                                    // finish
//! assert!(shell.is_complete());
//! ```

pub mod lesson;

// Convenience re-exports so callers can use `lesson_engine::dispatch`
// directly without reaching into the inner module.
pub use lesson::{
    apply, build_review_steps, dispatch, evaluate, helpers, is_complete, reconcile, report,
    to_client_state, to_client_step, validate_steps, Action, Answer, AnswerResult,
    AttemptEvent, ContinueAction, ContinueLabels, CueSink, EvaluationError, FeedbackCue,
    Lesson, LessonConfig, LessonError, LessonReport, LessonShell, LessonState, ReviewConfig,
    Shuffler, SilentCues, Step, StepAttempt, StepInput, StepKind, StepOutcome,
};
