//! Property-based tests for the lesson progression engine.
//!
//! Tests the following invariants:
//! - Termination: answer-then-continue completes within
//!   `original + missed + 1` continues
//! - Review scope: review sources are exactly the recordable first-pass misses
//! - No re-review: missing a review step never grows the missed set or
//!   rebuilds review
//! - Order: review follows miss order and sits between the authored content
//!   and the summary
//! - No-op safety: unknown ids and a second review build leave the state equal

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use lesson_engine::{
    apply, dispatch, helpers::{summary, true_false}, is_complete, Action, LessonState, Step,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

#[derive(Debug, Clone)]
struct Authored {
    assessment: bool,
    record_incorrect: bool,
    answered_correctly: bool,
}

fn arb_authored() -> impl Strategy<Value = Authored> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(assessment, record_incorrect, answered_correctly)| Authored {
            assessment,
            record_incorrect,
            answered_correctly,
        },
    )
}

fn arb_lesson() -> impl Strategy<Value = (Vec<Authored>, bool)> {
    (prop::collection::vec(arb_authored(), 1..10), any::<bool>())
}

fn steps_for(authored: &[Authored], with_summary: bool) -> Vec<Step> {
    let mut steps: Vec<Step> = authored
        .iter()
        .enumerate()
        .map(|(i, a)| {
            true_false(&format!("s{i}"), "statement", true)
                .with_assessment(a.assessment)
                .with_record_incorrect(a.record_incorrect)
        })
        .collect();
    if with_summary {
        steps.push(summary("end"));
    }
    steps
}

fn answers_for(authored: &[Authored]) -> HashMap<String, bool> {
    authored
        .iter()
        .enumerate()
        .map(|(i, a)| (format!("s{i}"), a.answered_correctly))
        .collect()
}

fn answer(step_id: &str, is_correct: Option<bool>) -> Action {
    Action::AnswerStep { step_id: step_id.to_string(), is_correct, answer_data: None }
}

/// Answer every step and continue until complete. Returns the final state, the
/// number of continues, and the state right after review was built (if ever).
fn drive(
    steps: Vec<Step>,
    answers: &HashMap<String, bool>,
    review_answers: &[bool],
) -> (LessonState, usize, Option<LessonState>) {
    const LIMIT: usize = 100;
    let mut state = LessonState::new(steps);
    let mut continues = 0;
    let mut review_seen = 0;
    let mut after_build = None;

    while !is_complete(&state) && continues < LIMIT {
        let step = state.current_step().cloned().expect("in-progress lesson has a current step");
        let correct = if step.is_summary() {
            None
        } else if step.is_review() {
            review_seen += 1;
            Some(review_answers[(review_seen - 1) % review_answers.len()])
        } else {
            answers.get(&step.id).copied()
        };

        state = dispatch(state, answer(&step.id, correct));
        state = dispatch(state, Action::EnableContinue);
        let built_before = state.has_built_review_steps();
        state = dispatch(state, Action::NextStep);
        continues += 1;

        if !built_before && state.has_built_review_steps() {
            after_build = Some(state.clone());
        }
    }
    (state, continues, after_build)
}

fn expected_misses(authored: &[Authored]) -> Vec<String> {
    authored
        .iter()
        .enumerate()
        .filter(|(_, a)| a.assessment && a.record_incorrect && !a.answered_correctly)
        .map(|(i, _)| format!("s{i}"))
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn lesson_always_terminates_within_bound(
        (authored, with_summary) in arb_lesson(),
        review_answers in prop::collection::vec(any::<bool>(), 1..5),
    ) {
        let steps = steps_for(&authored, with_summary);
        let original_len = steps.len();
        let (state, continues, _) = drive(steps, &answers_for(&authored), &review_answers);

        prop_assert!(is_complete(&state));
        prop_assert!(continues <= original_len + state.incorrect_steps().len() + 1);
    }

    #[test]
    fn review_scope_is_exactly_recordable_misses(
        (authored, with_summary) in arb_lesson(),
    ) {
        let (state, _, _) = drive(steps_for(&authored, with_summary), &answers_for(&authored), &[true]);

        let sources: BTreeSet<String> = state
            .all_steps()
            .iter()
            .filter_map(|s| s.review_source_step_id.clone())
            .collect();
        let expected: BTreeSet<String> = expected_misses(&authored).into_iter().collect();
        prop_assert_eq!(sources, expected.clone());
        prop_assert_eq!(state.has_built_review_steps(), !expected.is_empty());
    }

    #[test]
    fn review_misses_never_feed_back(
        (authored, with_summary) in arb_lesson(),
    ) {
        let (state, _, after_build) =
            drive(steps_for(&authored, with_summary), &answers_for(&authored), &[false]);

        if let Some(built) = after_build {
            prop_assert_eq!(state.incorrect_steps(), built.incorrect_steps());
            prop_assert_eq!(state.all_steps(), built.all_steps());
        }
        for id in state.incorrect_steps() {
            prop_assert!(state.original_steps().iter().any(|s| &s.id == id));
        }
    }

    #[test]
    fn review_follows_miss_order_and_precedes_summary(
        (authored, with_summary) in arb_lesson(),
        shuffle_seed in any::<u64>(),
    ) {
        let steps = steps_for(&authored, with_summary);
        let mut state = LessonState::new(steps.clone());

        // answer in a shuffled order so miss order differs from authored order
        let mut ids: Vec<usize> = (0..authored.len()).collect();
        ids.shuffle(&mut StdRng::seed_from_u64(shuffle_seed));
        for i in ids {
            state = apply(state, answer(&format!("s{i}"), Some(authored[i].answered_correctly)));
        }
        let missed = state.incorrect_steps().to_vec();
        state = apply(state, Action::BuildReviewSteps);

        let all = state.all_steps();
        let boundary = authored.len();
        prop_assert_eq!(&all[..boundary], &steps[..boundary]);

        let review: Vec<String> = all[boundary..]
            .iter()
            .take_while(|s| s.is_review())
            .filter_map(|s| s.review_source_step_id.clone())
            .collect();
        prop_assert_eq!(review, missed.clone());

        let summaries: Vec<usize> = all.iter().enumerate().filter(|(_, s)| s.is_summary()).map(|(i, _)| i).collect();
        if with_summary {
            prop_assert_eq!(summaries, vec![all.len() - 1]);
        } else {
            prop_assert!(summaries.is_empty());
            prop_assert_eq!(all.len(), boundary + missed.len());
        }
    }

    #[test]
    fn invalid_actions_are_no_ops(
        (authored, with_summary) in arb_lesson(),
        bogus in "[a-z]{1,8}",
    ) {
        let mut state = LessonState::new(steps_for(&authored, with_summary));
        for (i, a) in authored.iter().enumerate() {
            state = dispatch(state, answer(&format!("s{i}"), Some(a.answered_correctly)));
        }

        let bogus_id = format!("missing-{bogus}");
        prop_assert_eq!(apply(state.clone(), answer(&bogus_id, Some(false))), state.clone());

        let built = apply(state, Action::BuildReviewSteps);
        prop_assert_eq!(apply(built.clone(), Action::BuildReviewSteps), built);
    }
}
