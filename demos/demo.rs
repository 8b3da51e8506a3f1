//! End-to-end walk through one lesson.
//!
//! Run with: `cargo run --example demo`
//! (set `RUST_LOG=lesson_engine=debug` to watch every transition)
//!
//! This example shows how `lesson_engine` works end to end:
//!
//! 1. **Loading**: a lesson document is parsed from JSON and validated.
//! 2. **First pass**: a scripted learner answers every step and misses two of
//!    them. Only the answer standing when continue is pressed is recorded, so
//!    building up a multi-choice selection one option at a time is fine.
//! 3. **Review**: the engine injects review steps for exactly those misses
//!    before the summary; the learner's earlier answer is available for
//!    display on each review step.
//! 4. **Completion**: continuing past the summary fires the completion
//!    callback with a `LessonReport`.

use std::cell::RefCell;
use std::rc::Rc;

use lesson_engine::{
    FeedbackCue, Lesson, LessonConfig, LessonReport, LessonShell, StepInput, StepKind,
};
use tracing_subscriber::EnvFilter;

const LESSON: &str = r#"{
    "id": "digital-marketing-101",
    "title": "Channels and funnels",
    "steps": [
        { "id": "intro", "stepKind": "info", "title": "Welcome",
          "body": "Owned, earned and paid media each play a role in the funnel." },
        { "id": "owned", "stepKind": "single-choice", "title": "Owned media",
          "prompt": "Which of these is owned media?",
          "options": [
            { "id": "blog", "text": "Your company blog", "isCorrect": true },
            { "id": "banner", "text": "A banner ad on a news site" },
            { "id": "review", "text": "A customer review on a forum" }
          ] },
        { "id": "kpis", "stepKind": "multi-choice", "title": "Awareness KPIs",
          "prompt": "Which metrics measure awareness?",
          "options": [
            { "id": "reach", "text": "Reach", "isCorrect": true },
            { "id": "impressions", "text": "Impressions", "isCorrect": true },
            { "id": "cpa", "text": "Cost per acquisition" }
          ] },
        { "id": "ctr", "stepKind": "true-false", "title": "CTR",
          "statement": "Click-through rate is clicks divided by impressions.",
          "correctAnswer": true },
        { "id": "funnel", "stepKind": "order", "title": "The funnel",
          "prompt": "Put the stages in order.",
          "items": [
            { "id": "awareness", "text": "Awareness", "correctOrder": 1 },
            { "id": "consideration", "text": "Consideration", "correctOrder": 2 },
            { "id": "conversion", "text": "Conversion", "correctOrder": 3 }
          ] },
        { "id": "slogan", "stepKind": "fill-blanks",
          "text": "{{b1}} media is earned, {{b2}} media is bought.",
          "blanks": [
            { "id": "b1", "options": [ { "id": "press", "text": "Press" }, { "id": "ads", "text": "Ads" } ], "correctOptionId": "press" },
            { "id": "b2", "options": [ { "id": "press", "text": "Press" }, { "id": "ads", "text": "Ads" } ], "correctOptionId": "ads" }
          ] },
        { "id": "wrap-up", "stepKind": "summary", "body": "Nice work!" }
    ]
}"#;

/// The scripted learner: what to enter on each authored step. Review steps
/// reuse the source step's correct answer.
fn script(step_id: &str, first_pass: bool) -> Vec<StepInput> {
    let s = |v: &str| v.to_string();
    match (step_id, first_pass) {
        ("owned", true) => vec![StepInput::SelectOption(s("banner"))],
        ("owned", false) => vec![StepInput::SelectOption(s("blog"))],
        ("kpis", _) => vec![
            StepInput::ToggleOption(s("reach")),
            StepInput::ToggleOption(s("impressions")),
        ],
        ("ctr", _) => vec![StepInput::ChooseBool(true)],
        ("funnel", true) => vec![StepInput::Reorder(vec![
            s("consideration"),
            s("awareness"),
            s("conversion"),
        ])],
        ("funnel", false) => vec![StepInput::Reorder(vec![
            s("awareness"),
            s("consideration"),
            s("conversion"),
        ])],
        ("slogan", _) => vec![
            StepInput::FillBlank { blank: s("b1"), option: s("press") },
            StepInput::FillBlank { blank: s("b2"), option: s("ads") },
        ],
        _ => Vec::new(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = LessonConfig { shuffle_seed: Some(2024), ..Default::default() };
    let lesson = match Lesson::from_json(LESSON, &config.review) {
        Ok(lesson) => lesson,
        Err(e) => {
            eprintln!("invalid lesson: {e}");
            std::process::exit(1);
        }
    };

    let finished: Rc<RefCell<Option<LessonReport>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&finished);
    let mut shell = LessonShell::with_cues(config, Vec::<(String, FeedbackCue)>::new())
        .on_complete(move |report| *sink.borrow_mut() = Some(report.clone()));
    shell.load(lesson.steps);

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  {}", lesson.title.as_deref().unwrap_or(&lesson.id));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    while !shell.is_complete() {
        let Some(step) = shell.state().current_step().cloned() else {
            break;
        };
        let (source_id, first_pass) = match &step.review_source_step_id {
            Some(source) => (source.as_str(), false),
            None => (step.id.as_str(), true),
        };

        let position = shell.state().current_step_index() + 1;
        let total = shell.state().all_steps().len();
        println!(
            "  [{position}/{total}] {:<14} {}",
            step.kind.tag(),
            step.title.as_deref().unwrap_or(&step.id)
        );
        if let StepKind::Order(_) = step.kind {
            if let Some(layout) = shell.attempt().and_then(|a| a.layout()) {
                println!("         shown as: {}", layout.join(", "));
            }
        }
        if let Some(prior) = shell.attempt().and_then(|a| a.prior()) {
            println!("         last time: {}", prior.to_data());
        }

        for input in script(source_id, first_pass) {
            if let Err(e) = shell.input(input) {
                eprintln!("         rejected input: {e}");
            }
        }
        if let Some(outcome) = shell.pending_outcome() {
            let mark = match outcome.is_correct {
                Some(true) => "✓ correct",
                Some(false) => "✗ incorrect",
                None => "· seen",
            };
            println!("         {mark}");
        }

        let label = shell.continue_label().unwrap_or_default().to_string();
        match shell.press_continue() {
            Some(action) => println!("         → {label} ({action:?})"),
            None => {
                eprintln!("         learner is stuck on {}", step.id);
                break;
            }
        }
    }

    println!();
    println!("  Cues played: {}", shell.cues().len());
    if let Some(report) = finished.borrow().as_ref() {
        println!(
            "  Mastery: {:.0}%  ({} of {} right first time)",
            report.mastery() * 100.0,
            report.first_pass_correct,
            report.assessed_steps
        );
        println!(
            "  Reviewed: {} ({} right on review)",
            report.missed_step_ids.join(", "),
            report.review_correct
        );
    };
}
