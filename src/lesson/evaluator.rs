use std::collections::HashSet;

use crate::lesson::{
    error::EvaluationError,
    models::{
        Answer, ChoicePayload, FillBlanksPayload, MatchPayload, OrderPayload, StepKind,
        StepOutcome,
    },
};

/// Evaluate `answer` against the step kind it was given for.
///
/// Multi-part kinds (order, match, fill-blanks) and an empty multi-select
/// report `is_completed = false` until every part is answered; correctness is
/// only judged on a complete answer. Info and summary steps complete on
/// acknowledgement and carry no correctness.
pub fn evaluate(kind: &StepKind, answer: &Answer) -> Result<StepOutcome, EvaluationError> {
    let outcome = match (kind, answer) {
        (StepKind::Info(_), Answer::Acknowledge)
        | (StepKind::Summary(_), Answer::Acknowledge) => StepOutcome::completed(None, answer),

        (StepKind::SingleChoice(p), Answer::SingleChoice { option_id }) => {
            let correct = single_choice_correct(p, option_id);
            StepOutcome::completed(Some(correct), answer)
        }

        (StepKind::MultiChoice(p), Answer::MultiChoice { option_ids }) => {
            if option_ids.is_empty() {
                StepOutcome::incomplete()
            } else {
                let chosen: Vec<&str> = option_ids.iter().map(String::as_str).collect();
                StepOutcome::completed(Some(multi_choice_correct(p, &chosen)), answer)
            }
        }

        (StepKind::TrueFalse(p), Answer::TrueFalse { value }) => {
            StepOutcome::completed(Some(*value == p.correct_answer), answer)
        }

        (StepKind::Order(p), Answer::Order { item_ids }) => {
            if !order_is_complete(p, item_ids) {
                StepOutcome::incomplete()
            } else {
                StepOutcome::completed(Some(order_correct(p, item_ids)), answer)
            }
        }

        (StepKind::Match(p), Answer::Match { pairs }) => {
            let all_paired = p.left.iter().all(|l| pairs.contains_key(&l.id));
            if !all_paired {
                StepOutcome::incomplete()
            } else {
                let correct = match_correct(p, |left| pairs.get(left).map(String::as_str));
                StepOutcome::completed(Some(correct), answer)
            }
        }

        (StepKind::FillBlanks(p), Answer::FillBlanks { choices }) => {
            let all_filled = p.blanks.iter().all(|b| choices.contains_key(&b.id));
            if !all_filled {
                StepOutcome::incomplete()
            } else {
                let correct = blanks_correct(p, |blank| choices.get(blank).map(String::as_str));
                StepOutcome::completed(Some(correct), answer)
            }
        }

        (StepKind::ImageChoice(p), Answer::ImageChoice { image_id }) => {
            StepOutcome::completed(Some(*image_id == p.correct_image_id), answer)
        }

        (kind, answer) => {
            return Err(EvaluationError::KindMismatch {
                step: kind.tag(),
                answer: answer.kind_tag(),
            })
        }
    };
    Ok(outcome)
}

/// True if the chosen option exists and is flagged correct.
pub fn single_choice_correct(payload: &ChoicePayload, option_id: &str) -> bool {
    payload
        .options
        .iter()
        .any(|o| o.id == option_id && o.is_correct)
}

/// True if the chosen set is exactly the set of options flagged correct.
pub fn multi_choice_correct(payload: &ChoicePayload, chosen: &[&str]) -> bool {
    let expected: HashSet<&str> = payload
        .options
        .iter()
        .filter(|o| o.is_correct)
        .map(|o| o.id.as_str())
        .collect();
    let chosen: HashSet<&str> = chosen.iter().copied().collect();
    chosen == expected
}

/// An ordering is complete once it names every authored item exactly once.
pub fn order_is_complete(payload: &OrderPayload, item_ids: &[String]) -> bool {
    if item_ids.len() != payload.items.len() {
        return false;
    }
    let mut seen = HashSet::new();
    item_ids
        .iter()
        .all(|id| payload.items.iter().any(|i| &i.id == id) && seen.insert(id.as_str()))
}

/// True if every item sits at its authored 1-based `correct_order`.
pub fn order_correct(payload: &OrderPayload, item_ids: &[String]) -> bool {
    payload.items.iter().all(|item| {
        item_ids
            .iter()
            .position(|id| *id == item.id)
            .map(|pos| pos as u32 + 1 == item.correct_order)
            .unwrap_or(false)
    })
}

/// True if every authored pair is present in the learner's pairing.
pub fn match_correct<'a>(
    payload: &MatchPayload,
    paired_with: impl Fn(&str) -> Option<&'a str>,
) -> bool {
    payload
        .correct_pairs
        .iter()
        .all(|pair| paired_with(&pair.left_id) == Some(pair.right_id.as_str()))
}

/// True if every blank holds its authored correct option.
pub fn blanks_correct<'a>(
    payload: &FillBlanksPayload,
    chosen_for: impl Fn(&str) -> Option<&'a str>,
) -> bool {
    payload
        .blanks
        .iter()
        .all(|blank| chosen_for(&blank.id) == Some(blank.correct_option_id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::helpers::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn single_choice_checks_flag() {
        let step = single_choice("q", "Pick", &[("a", "A"), ("b", "B")], "b");
        let right = evaluate(&step.kind, &Answer::SingleChoice { option_id: "b".into() }).unwrap();
        let wrong = evaluate(&step.kind, &Answer::SingleChoice { option_id: "a".into() }).unwrap();
        assert!(right.is_completed && wrong.is_completed);
        assert_eq!(right.is_correct, Some(true));
        assert_eq!(wrong.is_correct, Some(false));
        assert!(right.answer_data.is_some());
    }

    #[test]
    fn multi_choice_needs_exact_set() {
        let step = multi_choice("m", "Pick all", &[("a", "A"), ("b", "B"), ("c", "C")], &["a", "c"]);
        let eval = |ids: &[&str]| {
            evaluate(&step.kind, &Answer::MultiChoice { option_ids: set(ids) }).unwrap()
        };

        assert_eq!(eval(&["a", "c"]).is_correct, Some(true));
        assert_eq!(eval(&["a"]).is_correct, Some(false), "fewer is wrong");
        assert_eq!(eval(&["a", "b", "c"]).is_correct, Some(false), "more is wrong");
        assert!(!eval(&[]).is_completed, "empty selection is not an answer");
    }

    #[test]
    fn true_false_compares_boolean() {
        let step = true_false("tf", "CTR is clicks over impressions", true);
        let yes = evaluate(&step.kind, &Answer::TrueFalse { value: true }).unwrap();
        let no = evaluate(&step.kind, &Answer::TrueFalse { value: false }).unwrap();
        assert_eq!(yes.is_correct, Some(true));
        assert_eq!(no.is_correct, Some(false));
    }

    #[test]
    fn order_uses_one_based_positions() {
        let step = order("o", "Funnel", &[("aware", 1), ("consider", 2), ("buy", 3)]);
        let ids = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let right = evaluate(&step.kind, &Answer::Order { item_ids: ids(&["aware", "consider", "buy"]) }).unwrap();
        let wrong = evaluate(&step.kind, &Answer::Order { item_ids: ids(&["consider", "aware", "buy"]) }).unwrap();
        let partial = evaluate(&step.kind, &Answer::Order { item_ids: ids(&["aware"]) }).unwrap();
        let dup = evaluate(&step.kind, &Answer::Order { item_ids: ids(&["aware", "aware", "buy"]) }).unwrap();

        assert_eq!(right.is_correct, Some(true));
        assert_eq!(wrong.is_correct, Some(false));
        assert!(!partial.is_completed);
        assert!(!dup.is_completed);
    }

    #[test]
    fn match_waits_for_every_left_item() {
        let step = matching("mt", "Match", &[("seo", "organic"), ("ppc", "paid")]);

        let partial = evaluate(&step.kind, &Answer::Match { pairs: map(&[("seo", "organic")]) }).unwrap();
        assert!(!partial.is_completed);
        assert_eq!(partial.is_correct, None);

        let right = evaluate(&step.kind, &Answer::Match { pairs: map(&[("seo", "organic"), ("ppc", "paid")]) }).unwrap();
        let wrong = evaluate(&step.kind, &Answer::Match { pairs: map(&[("seo", "paid"), ("ppc", "organic")]) }).unwrap();
        assert_eq!(right.is_correct, Some(true));
        assert_eq!(wrong.is_correct, Some(false));
    }

    #[test]
    fn fill_blanks_waits_for_every_blank() {
        let step = fill_blanks("fb", "{{b1}} and {{b2}}", &[("b1", "x"), ("b2", "y")], &["x", "y"]);

        let one = evaluate(&step.kind, &Answer::FillBlanks { choices: map(&[("b1", "x")]) }).unwrap();
        assert!(!one.is_completed);

        let both = evaluate(&step.kind, &Answer::FillBlanks { choices: map(&[("b1", "x"), ("b2", "y")]) }).unwrap();
        assert!(both.is_completed);
        assert_eq!(both.is_correct, Some(true));

        let miss = evaluate(&step.kind, &Answer::FillBlanks { choices: map(&[("b1", "x"), ("b2", "x")]) }).unwrap();
        assert_eq!(miss.is_correct, Some(false));
    }

    #[test]
    fn image_choice_compares_id() {
        let step = image_choice("img", "Which logo?", &["l1", "l2"], "l2");
        let right = evaluate(&step.kind, &Answer::ImageChoice { image_id: "l2".into() }).unwrap();
        assert_eq!(right.is_correct, Some(true));
    }

    #[test]
    fn info_and_summary_complete_without_correctness() {
        for step in [info("i", "Welcome"), summary("s")] {
            let out = evaluate(&step.kind, &Answer::Acknowledge).unwrap();
            assert!(out.is_completed);
            assert_eq!(out.is_correct, None);
        }
    }

    #[test]
    fn mismatched_answer_is_rejected() {
        let step = true_false("tf", "x", true);
        let err = evaluate(&step.kind, &Answer::ImageChoice { image_id: "a".into() }).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::KindMismatch { step: "true-false", answer: "image-choice" }
        );
    }
}
