//! Core lesson engine: step model, evaluation, progression and hosting.
//!
//! ## Module overview
//!
//! | Module        | Purpose |
//! |---------------|---------|
//! | `models`      | Step model: base fields, the nine step kinds, answers and outcomes |
//! | `evaluator`   | Correctness rules per step kind |
//! | `attempt`     | Per-step interaction state: drafts, deduplicated events, feedback cues |
//! | `review`      | Builds the review pass from missed steps |
//! | `engine`      | The progression state machine: `apply`, `reconcile`, `dispatch` |
//! | `shell`       | Hosts one lesson session: answer channel, continue affordance, callbacks |
//! | `shuffle`     | Seeded presentation order for order items and match columns |
//! | `report`      | End-of-lesson summary numbers |
//! | `client_view` | Answer-free JSON payloads for a UI client |
//! | `validate`    | Lesson documents: parsing and authoring checks |
//! | `config`      | Review labels, continue labels, shuffle seed |
//! | `error`       | Authoring and evaluation errors |
//! | `helpers`     | Shorthand step constructors |

pub mod attempt;
pub mod client_view;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod helpers;
pub mod models;
pub mod report;
pub mod review;
pub mod shell;
pub mod shuffle;
pub mod validate;

// Re-export the public API surface so callers can use
// `lesson::engine::dispatch` style paths or the flat names below.
pub use attempt::{AttemptEvent, FeedbackCue, StepAttempt, StepInput};
pub use client_view::{to_client_state, to_client_step};
pub use config::{ContinueLabels, LessonConfig, ReviewConfig};
pub use engine::{apply, dispatch, is_complete, reconcile, Action, LessonState};
pub use error::{EvaluationError, LessonError};
pub use evaluator::evaluate;
pub use models::{Answer, AnswerResult, Step, StepKind, StepOutcome};
pub use report::{report, LessonReport};
pub use review::build_review_steps;
pub use shell::{ContinueAction, CueSink, LessonShell, SilentCues};
pub use shuffle::Shuffler;
pub use validate::{validate_steps, Lesson};
