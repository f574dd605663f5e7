use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fusion::error::FusionError;

/// Per-item semantic similarity, finite values only.
pub type SemanticScores<K> = HashMap<K, f64>;

/// Per-item raw lexical relevance, non-negative and unbounded.
/// A missing entry means the item had no lexical match.
pub type RawKeywordScores<K> = HashMap<K, f64>;

const DEFAULT_KEYWORD_WEIGHT: f64 = 0.3;
const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.25;
const DEFAULT_MIN_KEYWORD_NORMALIZER: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Share of the keyword signal in the combined score (α).
    pub keyword_weight: f64,
    /// Minimum combined score kept in the ranking (τ).
    pub similarity_threshold: f64,
    /// Floor on the keyword normalization denominator (ε).
    pub min_keyword_normalizer: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            keyword_weight: DEFAULT_KEYWORD_WEIGHT,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_keyword_normalizer: DEFAULT_MIN_KEYWORD_NORMALIZER,
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), FusionError> {
        if !unit_interval(self.keyword_weight) {
            return Err(FusionError::InvalidConfig(format!(
                "keyword_weight must be within [0, 1], got {}",
                self.keyword_weight
            )));
        }
        if !unit_interval(self.similarity_threshold) {
            return Err(FusionError::InvalidConfig(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if !(self.min_keyword_normalizer.is_finite() && self.min_keyword_normalizer > 0.0) {
            return Err(FusionError::InvalidConfig(format!(
                "min_keyword_normalizer must be a positive finite number, got {}",
                self.min_keyword_normalizer
            )));
        }
        Ok(())
    }

    pub fn semantic_weight(&self) -> f64 {
        1.0 - self.keyword_weight
    }
}

fn unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// One entry of a ranked result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem<K> {
    pub item_id: K,
    pub score: f64,
}
