//! Score normalization and upstream sanitization.

use std::{collections::HashMap, hash::Hash};

use crate::fusion::models::{RawKeywordScores, SemanticScores};

/// Scales raw keyword scores so the best match in this result set is 1.0.
///
/// The denominator is `max(max(raw), epsilon)`: a set of uniformly tiny raw
/// scores stays proportionally small instead of being inflated to near 1.0.
pub fn normalize_keyword_scores<K>(raw: &HashMap<K, f64>, epsilon: f64) -> HashMap<K, f64>
where
    K: Clone + Eq + Hash,
{
    if raw.is_empty() {
        return HashMap::new();
    }
    let max = raw.values().copied().fold(f64::NEG_INFINITY, f64::max);
    let normalizer = max.max(epsilon);
    raw.iter()
        .map(|(id, score)| (id.clone(), score / normalizer))
        .collect()
}

/// Drops non-finite similarities. Returns the kept scores and how many were dropped.
pub fn sanitize_semantic_scores<K, I>(scores: I) -> (SemanticScores<K>, usize)
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut dropped = 0;
    let kept = scores
        .into_iter()
        .filter(|(_, score)| {
            let finite = score.is_finite();
            if !finite {
                dropped += 1;
            }
            finite
        })
        .collect();
    (kept, dropped)
}

/// Drops non-finite keyword scores and clamps negative ones to zero.
///
/// A clamped entry is still a lexical match, so it keeps the keyword floor.
pub fn sanitize_keyword_scores<K, I>(scores: I) -> (RawKeywordScores<K>, usize)
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut dropped = 0;
    let kept = scores
        .into_iter()
        .filter_map(|(id, score)| {
            if score.is_finite() {
                Some((id, score.max(0.0)))
            } else {
                dropped += 1;
                None
            }
        })
        .collect();
    (kept, dropped)
}
