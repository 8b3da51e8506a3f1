use tracing::trace;

use crate::lesson::{config::ReviewConfig, models::Step};

/// Build the review pass from the ids missed on first attempt.
///
/// Output follows `incorrect_ids` order (the order of first misses), not the
/// authored order. Each review step is a copy of its source with a derived id,
/// `review_source_step_id` pointing back, a review-labelled title (if the
/// source had one) and the fixed try-again description. Ids with no matching
/// source step are skipped.
pub fn build_review_steps(
    original_steps: &[Step],
    incorrect_ids: &[String],
    config: &ReviewConfig,
) -> Vec<Step> {
    incorrect_ids
        .iter()
        .filter_map(|id| {
            let source = original_steps.iter().find(|s| &s.id == id);
            if source.is_none() {
                trace!(step_id = %id, "missed step no longer in lesson, skipping review");
            }
            source
        })
        .map(|source| review_step(source, config))
        .collect()
}

fn review_step(source: &Step, config: &ReviewConfig) -> Step {
    Step {
        id: config.review_id(&source.id),
        title: source.title.as_deref().map(|t| config.review_title(t)),
        description: Some(config.description.clone()),
        review_source_step_id: Some(source.id.clone()),
        ..source.clone()
    }
}
