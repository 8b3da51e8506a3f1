//! Lesson configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! yields a working setup. Hosts typically ship one config per locale.

use serde::{Deserialize, Serialize};

use crate::lesson::error::LessonError;

/// How synthesized review steps are labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewConfig {
    /// Prepended to the source id to form the review step id.
    pub id_prefix: String,
    /// Prepended to the source title, when the source has one.
    pub title_prefix: String,
    /// Replaces the source description on every review step.
    pub description: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        ReviewConfig {
            id_prefix: "review-".to_string(),
            title_prefix: "Review: ".to_string(),
            description: "Let's try this one again.".to_string(),
        }
    }
}

impl ReviewConfig {
    /// Deterministic review id for a source step id.
    pub fn review_id(&self, source_id: &str) -> String {
        format!("{}{}", self.id_prefix, source_id)
    }

    pub fn review_title(&self, source_title: &str) -> String {
        format!("{}{}", self.title_prefix, source_title)
    }
}

/// Labels of the continue affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContinueLabels {
    #[serde(rename = "continue")]
    pub continue_label: String,
    #[serde(rename = "finish")]
    pub finish_label: String,
}

impl Default for ContinueLabels {
    fn default() -> Self {
        ContinueLabels {
            continue_label: "Continue".to_string(),
            finish_label: "Finish".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LessonConfig {
    pub review: ReviewConfig,
    pub labels: ContinueLabels,
    /// Seed for shuffling order items and match columns. `None` uses entropy.
    pub shuffle_seed: Option<u64>,
}

impl LessonConfig {
    pub fn from_json_str(json: &str) -> Result<Self, LessonError> {
        Ok(serde_json::from_str(json)?)
    }
}
