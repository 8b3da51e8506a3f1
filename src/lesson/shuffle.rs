use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::lesson::models::{Step, StepKind};

/// Shuffles the parts of a step that must not be shown in answer order.
pub struct Shuffler {
    rng: StdRng,
}

impl Shuffler {
    /// Seeded shufflers repeat the same layouts; `None` draws from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Shuffler { rng }
    }

    /// Fisher-Yates over a copy of `items`.
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            out.swap(i, j);
        }
        out
    }

    /// Display order of the shuffled column for `step`: the items of an order
    /// step or the right-hand items of a match step. Other kinds show their
    /// content as authored and get `None`.
    ///
    /// An order step with more than one item is never laid out already solved.
    pub fn layout(&mut self, step: &Step) -> Option<Vec<String>> {
        match &step.kind {
            StepKind::Order(p) => {
                let mut items: Vec<(u32, String)> =
                    p.items.iter().map(|i| (i.correct_order, i.id.clone())).collect();
                items.sort_by_key(|(pos, _)| *pos);
                let solved: Vec<String> = items.into_iter().map(|(_, id)| id).collect();

                let mut ids = self.shuffled(&solved);
                if ids.len() > 1 && ids == solved {
                    ids.rotate_left(1);
                }
                Some(ids)
            }
            StepKind::Match(p) => {
                let right: Vec<String> = p.right.iter().map(|r| r.id.clone()).collect();
                Some(self.shuffled(&right))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::helpers::*;

    #[test]
    fn shuffle_keeps_every_item() {
        let mut sh = Shuffler::new(Some(42));
        let items: Vec<u32> = (0..20).collect();
        let mut out = sh.shuffled(&items);
        out.sort_unstable();
        assert_eq!(out, items);
    }

    #[test]
    fn seeded_layout_is_deterministic() {
        let step = order("o", "Sort", &[("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)]);
        let make = |seed: u64| Shuffler::new(Some(seed)).layout(&step);
        assert_eq!(make(99), make(99));
    }

    #[test]
    fn order_layout_is_never_pre_solved() {
        let step = order("o", "Sort", &[("a", 1), ("b", 2)]);
        for seed in 0..50 {
            let ids = Shuffler::new(Some(seed)).layout(&step).unwrap();
            assert_ne!(ids, ["a", "b"], "seed {seed} produced the solved order");
        }
    }

    #[test]
    fn match_layout_shuffles_right_column_only() {
        let step = matching("m", "Match", &[("l1", "r1"), ("l2", "r2"), ("l3", "r3")]);
        let mut ids = Shuffler::new(Some(3)).layout(&step).unwrap();
        ids.sort();
        assert_eq!(ids, ["r1", "r2", "r3"]);
    }

    #[test]
    fn other_kinds_have_no_layout() {
        let mut sh = Shuffler::new(Some(1));
        assert_eq!(sh.layout(&true_false("t", "x", true)), None);
        assert_eq!(sh.layout(&info("i", "x")), None);
    }
}
