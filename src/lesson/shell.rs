//! Hosting a lesson: the two-way contract between a UI and the engine.
//!
//! [`LessonShell`] owns the single [`LessonState`] of a session, mounts a
//! [`StepAttempt`] for whatever step is current, turns learner input into
//! answer-channel reports, and drives the continue affordance. Only the last
//! completed report before continue is recorded with the engine. Rendering,
//! audio and app navigation stay with the host: the shell only hands out
//! client views, feedback cues and the completion/exit callbacks.

use serde_json::Value;
use tracing::debug;

use crate::lesson::{
    attempt::{AttemptEvent, FeedbackCue, StepAttempt, StepInput},
    client_view::to_client_state,
    config::LessonConfig,
    engine::{dispatch, is_complete, Action, LessonState},
    error::EvaluationError,
    models::{Step, StepOutcome},
    report::{report, LessonReport},
    shuffle::Shuffler,
};

/// Receives feedback cues. Playing them must not feed back into the engine.
pub trait CueSink {
    fn play(&mut self, step_id: &str, cue: FeedbackCue);
}

/// Discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl CueSink for SilentCues {
    fn play(&mut self, _step_id: &str, _cue: FeedbackCue) {}
}

/// Records cues in order, for hosts that batch them (and for tests).
impl CueSink for Vec<(String, FeedbackCue)> {
    fn play(&mut self, step_id: &str, cue: FeedbackCue) {
        self.push((step_id.to_string(), cue));
    }
}

/// What pressing continue will do from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueAction {
    /// Last step: advance past it and report completion.
    Finish,
    /// Next authored step is the summary and review has not been built yet:
    /// build review if anything was missed, otherwise jump to the summary.
    EnterReview,
    Next,
}

impl ContinueAction {
    /// `None` once the lesson is complete.
    pub fn for_state(state: &LessonState) -> Option<ContinueAction> {
        let idx = state.current_step_index();
        let len = state.all_steps().len();
        if idx >= len {
            return None;
        }
        if idx + 1 == len {
            return Some(ContinueAction::Finish);
        }
        let next_is_summary = state
            .original_steps()
            .get(idx + 1)
            .map(Step::is_summary)
            .unwrap_or(false);
        if next_is_summary && !state.has_built_review_steps() {
            return Some(ContinueAction::EnterReview);
        }
        Some(ContinueAction::Next)
    }
}

type CompleteCallback = Box<dyn FnMut(&LessonReport)>;
type ExitCallback = Box<dyn FnMut()>;

pub struct LessonShell<C: CueSink = SilentCues> {
    state: LessonState,
    config: LessonConfig,
    shuffler: Shuffler,
    attempt: Option<StepAttempt>,
    /// Latest completed outcome for the current step, committed on continue.
    pending: Option<StepOutcome>,
    cues: C,
    on_complete: Option<CompleteCallback>,
    on_exit: Option<ExitCallback>,
    completion_reported: bool,
}

impl LessonShell<SilentCues> {
    pub fn new(config: LessonConfig) -> Self {
        LessonShell::with_cues(config, SilentCues)
    }
}

impl<C: CueSink> LessonShell<C> {
    pub fn with_cues(config: LessonConfig, cues: C) -> Self {
        LessonShell {
            state: LessonState::with_config(config.review.clone()),
            shuffler: Shuffler::new(config.shuffle_seed),
            config,
            attempt: None,
            pending: None,
            cues,
            on_complete: None,
            on_exit: None,
            completion_reported: false,
        }
    }

    /// Invoked once, when the learner continues past the final step.
    pub fn on_complete(mut self, f: impl FnMut(&LessonReport) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Invoked if the learner aborts through [`LessonShell::exit`].
    pub fn on_exit(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_exit = Some(Box::new(f));
        self
    }

    /// Start the lesson. Replaces any lesson in progress.
    pub fn load(&mut self, steps: Vec<Step>) {
        self.state = dispatch(std::mem::take(&mut self.state), Action::Init(steps));
        self.completion_reported = false;
        self.mount();
    }

    pub fn state(&self) -> &LessonState {
        &self.state
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }

    pub fn attempt(&self) -> Option<&StepAttempt> {
        self.attempt.as_ref()
    }

    /// The answer that continue would record for the current step.
    pub fn pending_outcome(&self) -> Option<&StepOutcome> {
        self.pending.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        is_complete(&self.state)
    }

    pub fn report(&self) -> LessonReport {
        report(&self.state)
    }

    /// Client payload for the current step.
    pub fn view(&self) -> Value {
        let layout = self.attempt.as_ref().and_then(StepAttempt::layout);
        to_client_state(&self.state, layout)
    }

    /// Route one learner interaction to the current step.
    pub fn input(&mut self, input: StepInput) -> Result<(), EvaluationError> {
        let event = match self.attempt.as_mut() {
            Some(attempt) => attempt.input(input)?,
            None => None,
        };
        if let Some(event) = event {
            self.handle_event(event);
        }
        Ok(())
    }

    /// The answer channel. A completed outcome replaces any earlier one and
    /// opens the continue gate; an incomplete one drops it and closes the gate.
    /// Nothing reaches the engine's answer record until continue is pressed.
    pub fn on_answered(&mut self, outcome: StepOutcome) {
        if self.state.current_step().is_none() {
            return;
        }
        let state = std::mem::take(&mut self.state);
        self.state = if outcome.is_completed {
            self.pending = Some(outcome);
            dispatch(state, Action::EnableContinue)
        } else {
            self.pending = None;
            dispatch(state, Action::DisableContinue)
        };
    }

    pub fn continue_action(&self) -> Option<ContinueAction> {
        ContinueAction::for_state(&self.state)
    }

    pub fn can_continue(&self) -> bool {
        self.state.is_continue_enabled() && self.continue_action().is_some()
    }

    /// Label for the continue affordance; `None` once complete.
    pub fn continue_label(&self) -> Option<&str> {
        let labels = &self.config.labels;
        self.continue_action().map(|action| match action {
            ContinueAction::Finish => labels.finish_label.as_str(),
            _ => labels.continue_label.as_str(),
        })
    }

    /// Press continue. Returns what was done, or `None` if the gate is closed.
    pub fn press_continue(&mut self) -> Option<ContinueAction> {
        if !self.state.is_continue_enabled() {
            return None;
        }
        let action = self.continue_action()?;
        self.commit_pending();
        let state = std::mem::take(&mut self.state);
        self.state = match action {
            ContinueAction::Next | ContinueAction::Finish => dispatch(state, Action::NextStep),
            ContinueAction::EnterReview if state.incorrect_steps().is_empty() => {
                dispatch(state, Action::GoToSummary)
            }
            ContinueAction::EnterReview => dispatch(state, Action::BuildReviewSteps),
        };
        debug!(?action, index = self.state.current_step_index(), "continued");

        if self.is_complete() {
            self.attempt = None;
            self.report_completion();
        } else {
            self.mount();
        }
        Some(action)
    }

    /// Abandon the lesson. The state holds no external resources.
    pub fn exit(mut self) {
        debug!(index = self.state.current_step_index(), "lesson exited");
        if let Some(f) = self.on_exit.as_mut() {
            f();
        }
    }

    /// Record the final answer for the current step.
    fn commit_pending(&mut self) {
        let (Some(outcome), Some(step)) = (self.pending.take(), self.state.current_step()) else {
            return;
        };
        let action = Action::AnswerStep {
            step_id: step.id.clone(),
            is_correct: outcome.is_correct,
            answer_data: outcome.answer_data,
        };
        self.state = dispatch(std::mem::take(&mut self.state), action);
    }

    fn report_completion(&mut self) {
        if self.completion_reported {
            return;
        }
        self.completion_reported = true;
        let summary = report(&self.state);
        debug!(mastery = summary.mastery(), "lesson complete");
        if let Some(f) = self.on_complete.as_mut() {
            f(&summary);
        }
    }

    fn mount(&mut self) {
        self.pending = None;
        let Some(step) = self.state.current_step() else {
            self.attempt = None;
            return;
        };
        let prior = step
            .review_source_step_id
            .as_deref()
            .and_then(|source| self.state.answer_for(source))
            .and_then(|a| a.answer_data.as_ref());
        let mut attempt = StepAttempt::new(step.clone())
            .with_layout(self.shuffler.layout(step))
            .with_prior(prior);
        debug!(step_id = %step.id, kind = %step.kind, "step mounted");

        let event = attempt.mount();
        self.attempt = Some(attempt);
        if let Some(event) = event {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: AttemptEvent) {
        if let (Some(cue), Some(step)) = (event.cue, self.state.current_step()) {
            self.cues.play(&step.id, cue);
        }
        self.on_answered(event.outcome);
    }
}
