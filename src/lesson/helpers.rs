//! Shorthand constructors for every step kind.
//!
//! Authored lessons normally arrive as JSON; these builders exist so tests,
//! demos and hosts that assemble lessons in code don't have to spell out every
//! payload struct. Display text defaults to the id where a builder doesn't
//! take it explicitly.

use crate::lesson::models::*;

pub fn info(id: &str, body: &str) -> Step {
    Step::new(id, StepKind::Info(ContentPayload { body: Some(body.to_string()) }))
}

pub fn summary(id: &str) -> Step {
    Step::new(id, StepKind::Summary(ContentPayload::default()))
}

fn choice_options(options: &[(&str, &str)], is_correct: impl Fn(&str) -> bool) -> Vec<ChoiceOption> {
    options
        .iter()
        .map(|(id, text)| ChoiceOption {
            id: id.to_string(),
            text: text.to_string(),
            is_correct: is_correct(*id),
            explanation: None,
        })
        .collect()
}

/// `options` are `(id, text)`; the option whose id equals `correct` is flagged.
pub fn single_choice(id: &str, prompt: &str, options: &[(&str, &str)], correct: &str) -> Step {
    Step::new(
        id,
        StepKind::SingleChoice(ChoicePayload {
            prompt: prompt.to_string(),
            options: choice_options(options, |o| o == correct),
        }),
    )
}

pub fn multi_choice(id: &str, prompt: &str, options: &[(&str, &str)], correct: &[&str]) -> Step {
    Step::new(
        id,
        StepKind::MultiChoice(ChoicePayload {
            prompt: prompt.to_string(),
            options: choice_options(options, |o| correct.contains(&o)),
        }),
    )
}

pub fn true_false(id: &str, statement: &str, correct: bool) -> Step {
    Step::new(
        id,
        StepKind::TrueFalse(TrueFalsePayload {
            statement: statement.to_string(),
            correct_answer: correct,
            explanation: None,
        }),
    )
}

/// `items` are `(item_id, correct_order)`.
pub fn order(id: &str, prompt: &str, items: &[(&str, u32)]) -> Step {
    Step::new(
        id,
        StepKind::Order(OrderPayload {
            prompt: prompt.to_string(),
            items: items
                .iter()
                .map(|(item, pos)| OrderItem {
                    id: item.to_string(),
                    text: item.to_string(),
                    correct_order: *pos,
                })
                .collect(),
        }),
    )
}

/// `pairs` are the correct `(left_id, right_id)` pairs; both columns are
/// derived from them.
pub fn matching(id: &str, prompt: &str, pairs: &[(&str, &str)]) -> Step {
    let item = |s: &str| MatchItem { id: s.to_string(), text: s.to_string() };
    Step::new(
        id,
        StepKind::Match(MatchPayload {
            prompt: prompt.to_string(),
            left: pairs.iter().map(|(l, _)| item(*l)).collect(),
            right: pairs.iter().map(|(_, r)| item(*r)).collect(),
            correct_pairs: pairs
                .iter()
                .map(|(l, r)| MatchPair { left_id: l.to_string(), right_id: r.to_string() })
                .collect(),
        }),
    )
}

/// `blanks` are `(blank_id, correct_option_id)`; every blank offers the same
/// `options`.
pub fn fill_blanks(id: &str, text: &str, blanks: &[(&str, &str)], options: &[&str]) -> Step {
    Step::new(
        id,
        StepKind::FillBlanks(FillBlanksPayload {
            text: text.to_string(),
            blanks: blanks
                .iter()
                .map(|(blank, correct)| Blank {
                    id: blank.to_string(),
                    options: options
                        .iter()
                        .map(|o| BlankOption { id: o.to_string(), text: o.to_string() })
                        .collect(),
                    correct_option_id: correct.to_string(),
                })
                .collect(),
        }),
    )
}

pub fn image_choice(id: &str, prompt: &str, images: &[&str], correct: &str) -> Step {
    Step::new(
        id,
        StepKind::ImageChoice(ImageChoicePayload {
            prompt: prompt.to_string(),
            images: images
                .iter()
                .map(|img| ImageOption {
                    id: img.to_string(),
                    src: format!("{img}.png"),
                    alt: None,
                })
                .collect(),
            correct_image_id: correct.to_string(),
        }),
    )
}
