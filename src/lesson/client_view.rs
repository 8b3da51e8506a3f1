//! JSON payloads for a UI client.
//!
//! Everything that would give the answer away (`isCorrect` flags,
//! `correctOrder`, correct pairs and ids, explanations) is stripped; the client
//! only ever learns correctness through evaluated outcomes.

use serde_json::{json, Value};

use crate::lesson::{
    engine::{is_complete, LessonState},
    models::{Step, StepKind},
};

fn ids_with_text<'a>(items: impl Iterator<Item = (&'a str, &'a str)>) -> Value {
    Value::Array(items.map(|(id, text)| json!({ "id": id, "text": text })).collect())
}

/// Reorder `items` by `layout` (ids); items missing from the layout keep their
/// authored position at the end.
fn laid_out<'a, T>(items: &'a [T], id_of: impl Fn(&T) -> &str, layout: Option<&[String]>) -> Vec<&'a T> {
    let Some(layout) = layout else {
        return items.iter().collect();
    };
    let mut out: Vec<&T> = layout
        .iter()
        .filter_map(|id| items.iter().find(|i| id_of(*i) == id))
        .collect();
    out.extend(items.iter().filter(|i| !layout.iter().any(|id| id == id_of(*i))));
    out
}

/// Kind-specific public content of a step.
fn public_content(kind: &StepKind, layout: Option<&[String]>) -> Value {
    match kind {
        StepKind::Info(p) | StepKind::Summary(p) => json!({ "body": p.body }),

        StepKind::SingleChoice(p) | StepKind::MultiChoice(p) => json!({
            "prompt": p.prompt,
            "options": ids_with_text(p.options.iter().map(|o| (o.id.as_str(), o.text.as_str()))),
        }),

        StepKind::TrueFalse(p) => json!({ "statement": p.statement }),

        StepKind::Order(p) => {
            let items = laid_out(&p.items, |i| i.id.as_str(), layout);
            json!({
                "prompt": p.prompt,
                "items": ids_with_text(items.into_iter().map(|i| (i.id.as_str(), i.text.as_str()))),
            })
        }

        StepKind::Match(p) => {
            let right = laid_out(&p.right, |i| i.id.as_str(), layout);
            json!({
                "prompt": p.prompt,
                "left": ids_with_text(p.left.iter().map(|i| (i.id.as_str(), i.text.as_str()))),
                "right": ids_with_text(right.into_iter().map(|i| (i.id.as_str(), i.text.as_str()))),
            })
        }

        StepKind::FillBlanks(p) => {
            let blanks: Vec<Value> = p
                .blanks
                .iter()
                .map(|b| {
                    json!({
                        "id": b.id,
                        "options": ids_with_text(b.options.iter().map(|o| (o.id.as_str(), o.text.as_str()))),
                    })
                })
                .collect();
            json!({ "text": p.text, "blanks": blanks })
        }

        StepKind::ImageChoice(p) => {
            let images: Vec<Value> = p
                .images
                .iter()
                .map(|i| json!({ "id": i.id, "src": i.src, "alt": i.alt }))
                .collect();
            json!({ "prompt": p.prompt, "images": images })
        }
    }
}

/// Public view of one step.
pub fn to_client_step(step: &Step, layout: Option<&[String]>) -> Value {
    json!({
        "id": step.id,
        "stepKind": step.kind.tag(),
        "title": step.title,
        "description": step.description,
        "isReview": step.is_review(),
        "content": public_content(&step.kind, layout),
    })
}

/// Public view of the whole lesson session: current step plus progress.
pub fn to_client_state(state: &LessonState, layout: Option<&[String]>) -> Value {
    let total = state.all_steps().len();
    json!({
        "step": state.current_step().map(|s| to_client_step(s, layout)),
        "progress": {
            "position": state.current_step_index().min(total),
            "total": total,
            "inReview": state.is_in_review(),
            "isComplete": is_complete(state),
        },
        "continueEnabled": state.is_continue_enabled(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::helpers::*;

    #[test]
    fn correctness_never_leaks() {
        let steps = [
            single_choice("q1", "?", &[("a", "A"), ("b", "B")], "a"),
            order("q2", "?", &[("x", 1), ("y", 2)]),
            matching("q3", "?", &[("l", "r")]),
            fill_blanks("q4", "{{b}}", &[("b", "o1")], &["o1"]),
            image_choice("q5", "?", &["i1"], "i1"),
            true_false("q6", "?", true),
        ];
        for step in &steps {
            let text = to_client_step(step, None).to_string();
            for leak in ["isCorrect", "correctOrder", "correctPairs", "correctOptionId", "correctImageId", "correctAnswer"] {
                assert!(!text.contains(leak), "{leak} leaked for {}", step.id);
            }
        }
    }

    #[test]
    fn order_items_follow_layout() {
        let step = order("o", "?", &[("x", 1), ("y", 2), ("z", 3)]);
        let layout = vec!["z".to_string(), "x".to_string(), "y".to_string()];
        let v = to_client_step(&step, Some(layout.as_slice()));
        let ids: Vec<&str> = v["content"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["z", "x", "y"]);
    }

    #[test]
    fn state_view_reports_progress() {
        let state = LessonState::new(vec![info("i", "hi"), summary("s")]);
        let v = to_client_state(&state, None);
        assert_eq!(v["step"]["id"], "i");
        assert_eq!(v["progress"]["position"], 0);
        assert_eq!(v["progress"]["total"], 2);
        assert_eq!(v["progress"]["isComplete"], false);
        assert_eq!(v["continueEnabled"], false);
    }
}
