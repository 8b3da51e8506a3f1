//! The lesson progression state machine.
//!
//! [`apply`] is a pure transition function over [`LessonState`]; [`reconcile`]
//! performs the automatic review/summary transition at the end of the
//! authored content, and [`dispatch`] composes the two so callers always get
//! a settled state back. No transition can fail: an action whose precondition
//! does not hold returns the state unchanged.
//!
//! ## Lifecycle
//!
//! ```text
//! Init ─► step 0 … step k ─┬─ nothing missed ──► GoToSummary ─► summary ─► complete
//!                          └─ misses recorded ─► BuildReviewSteps ─► review 0 … review m ─► summary ─► complete
//! ```
//!
//! Review is built at most once per lesson; misses on review steps are
//! recorded as answers but never re-reviewed.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, trace};

use crate::lesson::{
    config::ReviewConfig,
    models::{AnswerResult, Step},
    review::build_review_steps,
};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start (or restart) a lesson with the authored steps.
    Init(Vec<Step>),
    EnableContinue,
    DisableContinue,
    /// Record the latest answer for a step. Re-answering overwrites.
    AnswerStep {
        step_id: String,
        is_correct: Option<bool>,
        answer_data: Option<Value>,
    },
    NextStep,
    BuildReviewSteps,
    GoToSummary,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Init(_) => "INIT",
            Action::EnableContinue => "ENABLE_CONTINUE",
            Action::DisableContinue => "DISABLE_CONTINUE",
            Action::AnswerStep { .. } => "ANSWER_STEP",
            Action::NextStep => "NEXT_STEP",
            Action::BuildReviewSteps => "BUILD_REVIEW_STEPS",
            Action::GoToSummary => "GO_TO_SUMMARY",
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Full state of one lesson session.
///
/// Fields are only changed through [`apply`]; accessors expose them read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonState {
    original_steps: Vec<Step>,
    all_steps: Vec<Step>,
    current_step_index: usize,
    answers_by_step_id: BTreeMap<String, AnswerResult>,
    incorrect_steps: Vec<String>,
    has_built_review_steps: bool,
    is_continue_enabled: bool,
    review_config: ReviewConfig,
}

impl LessonState {
    /// An empty state that labels review steps with `review_config`.
    /// Dispatch [`Action::Init`] to load a lesson.
    pub fn with_config(review_config: ReviewConfig) -> Self {
        LessonState { review_config, ..LessonState::default() }
    }

    /// Settled state for `steps` with the default review labels.
    pub fn new(steps: Vec<Step>) -> Self {
        dispatch(LessonState::default(), Action::Init(steps))
    }

    pub fn original_steps(&self) -> &[Step] {
        &self.original_steps
    }

    pub fn all_steps(&self) -> &[Step] {
        &self.all_steps
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.all_steps.get(self.current_step_index)
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.all_steps.iter().find(|s| s.id == step_id)
    }

    pub fn answers_by_step_id(&self) -> &BTreeMap<String, AnswerResult> {
        &self.answers_by_step_id
    }

    pub fn answer_for(&self, step_id: &str) -> Option<&AnswerResult> {
        self.answers_by_step_id.get(step_id)
    }

    /// Original step ids missed on first attempt, in the order first missed.
    pub fn incorrect_steps(&self) -> &[String] {
        &self.incorrect_steps
    }

    pub fn has_built_review_steps(&self) -> bool {
        self.has_built_review_steps
    }

    pub fn is_continue_enabled(&self) -> bool {
        self.is_continue_enabled
    }

    pub fn review_config(&self) -> &ReviewConfig {
        &self.review_config
    }

    /// Index of the summary step in `all_steps`, if the lesson has one.
    pub fn summary_index(&self) -> Option<usize> {
        self.all_steps.iter().position(Step::is_summary)
    }

    /// Number of authored steps before the summary (all of them if there is
    /// no summary). This is where review steps are spliced in.
    pub fn review_boundary(&self) -> usize {
        self.original_steps
            .iter()
            .position(Step::is_summary)
            .unwrap_or(self.original_steps.len())
    }

    /// True while the cursor sits on a synthesized review step.
    pub fn is_in_review(&self) -> bool {
        self.current_step().map(Step::is_review).unwrap_or(false)
    }

    /// The cursor is at the end of the authored content and review (or the
    /// jump to the summary) has not been settled yet.
    fn at_review_boundary(&self) -> bool {
        !self.has_built_review_steps && self.current_step_index == self.review_boundary()
    }
}

/// No step remains at the cursor and nothing is pending at the review
/// boundary, i.e. the learner has continued past the final step.
pub fn is_complete(state: &LessonState) -> bool {
    let pending_review = state.at_review_boundary() && !state.incorrect_steps.is_empty();
    state.current_step_index >= state.all_steps.len() && !pending_review
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Apply one action. Returns `state` unchanged if the action's precondition
/// does not hold.
pub fn apply(state: LessonState, action: Action) -> LessonState {
    let name = action.name();
    let next = match action {
        Action::Init(steps) => Ok(init(state, steps)),
        Action::EnableContinue => set_continue(state, true),
        Action::DisableContinue => set_continue(state, false),
        Action::AnswerStep { step_id, is_correct, answer_data } => {
            answer_step(state, step_id, is_correct, answer_data)
        }
        Action::NextStep => next_step(state),
        Action::BuildReviewSteps => build_review(state),
        Action::GoToSummary => go_to_summary(state),
    };
    match next {
        Ok(s) => {
            trace!(action = name, index = s.current_step_index, "applied");
            s
        }
        Err(s) => {
            debug!(action = name, index = s.current_step_index, "precondition not met, state unchanged");
            s
        }
    }
}

/// Settle the cursor at the end of authored content: build the review pass if
/// anything was missed, otherwise jump to the summary. Idempotent, and inert
/// once review has been built.
pub fn reconcile(state: LessonState) -> LessonState {
    if !state.at_review_boundary() {
        return state;
    }
    if state.incorrect_steps.is_empty() {
        apply(state, Action::GoToSummary)
    } else {
        apply(state, Action::BuildReviewSteps)
    }
}

/// [`apply`] followed by [`reconcile`].
pub fn dispatch(state: LessonState, action: Action) -> LessonState {
    reconcile(apply(state, action))
}

// Each handler returns `Err(state)` (untouched) when its precondition fails.
type Transition = Result<LessonState, LessonState>;

fn init(state: LessonState, steps: Vec<Step>) -> LessonState {
    debug!(steps = steps.len(), "lesson initialised");
    LessonState {
        all_steps: steps.clone(),
        original_steps: steps,
        current_step_index: 0,
        answers_by_step_id: BTreeMap::new(),
        incorrect_steps: Vec::new(),
        has_built_review_steps: false,
        is_continue_enabled: false,
        review_config: state.review_config,
    }
}

fn set_continue(mut state: LessonState, enabled: bool) -> Transition {
    if state.current_step_index >= state.all_steps.len() {
        return Err(state);
    }
    state.is_continue_enabled = enabled;
    Ok(state)
}

fn answer_step(
    mut state: LessonState,
    step_id: String,
    is_correct: Option<bool>,
    answer_data: Option<Value>,
) -> Transition {
    let Some(step) = state.step(&step_id) else {
        return Err(state);
    };

    // Misses count only on the first pass, before review is built.
    let counts_as_miss = !state.has_built_review_steps
        && !step.is_review()
        && step.is_assessment()
        && step.record_incorrect
        && is_correct == Some(false);

    if counts_as_miss && !state.incorrect_steps.contains(&step_id) {
        debug!(step_id = %step_id, "step missed, queued for review");
        state.incorrect_steps.push(step_id.clone());
    }

    state.answers_by_step_id.insert(
        step_id.clone(),
        AnswerResult { step_id, is_correct, answer_data },
    );
    Ok(state)
}

fn next_step(mut state: LessonState) -> Transition {
    if !state.is_continue_enabled || state.current_step_index >= state.all_steps.len() {
        return Err(state);
    }
    state.current_step_index += 1;
    state.is_continue_enabled = false;
    Ok(state)
}

fn build_review(mut state: LessonState) -> Transition {
    if state.has_built_review_steps || state.incorrect_steps.is_empty() {
        return Err(state);
    }

    let boundary = state.review_boundary();
    let review = build_review_steps(
        &state.original_steps,
        &state.incorrect_steps,
        &state.review_config,
    );
    debug!(review_steps = review.len(), "building review pass");

    let mut all_steps = Vec::with_capacity(boundary + review.len() + 1);
    all_steps.extend_from_slice(&state.original_steps[..boundary]);
    all_steps.extend(review);
    if let Some(summary) = state.original_steps.get(boundary) {
        all_steps.push(summary.clone());
    }

    state.all_steps = all_steps;
    state.current_step_index = boundary;
    state.has_built_review_steps = true;
    state.is_continue_enabled = false;
    Ok(state)
}

fn go_to_summary(mut state: LessonState) -> Transition {
    match state.summary_index() {
        Some(idx) if idx != state.current_step_index => {
            state.current_step_index = idx;
            state.is_continue_enabled = false;
            Ok(state)
        }
        _ => Err(state),
    }
}
