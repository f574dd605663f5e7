use std::{collections::BTreeSet, hash::Hash};

use crate::fusion::{
    error::FusionError,
    models::{FusionConfig, RawKeywordScores, ScoredItem, SemanticScores},
    normalize::normalize_keyword_scores,
};

/// Weighted semantic/keyword fusion with a relevance threshold and keyword floor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreFusion {
    config: FusionConfig,
}

impl ScoreFusion {
    pub fn new(config: FusionConfig) -> Result<Self, FusionError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Ranks the union of both maps, best first.
    ///
    /// Any item present in `raw_keyword` scores at least the threshold, so a
    /// lexical match is never cut by a weak semantic signal. Items below the
    /// threshold are dropped. Equal scores are ordered by ascending item id.
    pub fn rank<K>(
        &self,
        semantic: &SemanticScores<K>,
        raw_keyword: &RawKeywordScores<K>,
    ) -> Vec<ScoredItem<K>>
    where
        K: Clone + Eq + Hash + Ord,
    {
        let keyword = normalize_keyword_scores(raw_keyword, self.config.min_keyword_normalizer);
        let threshold = self.config.similarity_threshold;

        let candidates: BTreeSet<&K> = semantic.keys().chain(keyword.keys()).collect();

        let mut ranked: Vec<ScoredItem<K>> = candidates
            .into_iter()
            .filter_map(|id| {
                let mut score = self.combine(
                    semantic.get(id).copied().unwrap_or(0.0),
                    keyword.get(id).copied().unwrap_or(0.0),
                );
                if raw_keyword.contains_key(id) && score < threshold {
                    score = threshold;
                }
                (score >= threshold).then(|| ScoredItem {
                    item_id: id.clone(),
                    score,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        ranked
    }

    fn combine(&self, semantic: f64, keyword: f64) -> f64 {
        self.config.keyword_weight * keyword + self.config.semantic_weight() * semantic
    }
}
