use std::{collections::HashMap, fmt, future::Future, sync::Arc, time::Duration, time::Instant};

use hybridrank_core::{sanitize_keyword_scores, sanitize_semantic_scores, ScoreFusion, ScoredItem};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    search::sources::{KeywordSource, SemanticSource, SourceError},
    vector::{EmbeddingError, EmbeddingProvider},
};

/// Which of the two concurrent lookups an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Semantic,
    Keyword,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Semantic => write!(f, "semantic"),
            Lookup::Keyword => write!(f, "keyword"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query must not be blank")]
    BlankQuery,
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("semantic lookup failed: {0}")]
    Semantic(#[source] SourceError),
    #[error("keyword lookup failed: {0}")]
    Keyword(#[source] SourceError),
    #[error("{lookup} lookup timed out after {timeout_ms}ms")]
    Timeout { lookup: Lookup, timeout_ms: u64 },
    #[error("async runtime error: {0}")]
    Runtime(String),
}

/// Answers queries by fusing vector similarity with lexical relevance.
///
/// Both lookups run concurrently and must both succeed before fusion; a
/// failed or timed-out lookup fails the whole query. Dropping the future
/// returned by [`HybridSearcher::search`] cancels both lookups.
pub struct HybridSearcher {
    embeddings: Arc<dyn EmbeddingProvider>,
    semantic: Arc<dyn SemanticSource>,
    keyword: Arc<dyn KeywordSource>,
    fusion: ScoreFusion,
    lookup_timeout: Option<Duration>,
}

impl HybridSearcher {
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        semantic: Arc<dyn SemanticSource>,
        keyword: Arc<dyn KeywordSource>,
        fusion: ScoreFusion,
    ) -> Self {
        Self {
            embeddings,
            semantic,
            keyword,
            fusion,
            lookup_timeout: None,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    pub fn fusion(&self) -> &ScoreFusion {
        &self.fusion
    }

    pub async fn search(&self, query: &str) -> Result<Vec<ScoredItem<Uuid>>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::BlankQuery);
        }

        let start = Instant::now();
        let embedding = self.embed_query(query).await?;

        let (semantic, keyword) = tokio::try_join!(
            self.run_lookup(Lookup::Semantic, self.semantic.max_similarity(&embedding)),
            self.run_lookup(Lookup::Keyword, self.keyword.keyword_scores(query)),
        )?;

        let (semantic, dropped_semantic) = sanitize_semantic_scores(semantic);
        let (keyword, dropped_keyword) = sanitize_keyword_scores(keyword);
        if dropped_semantic > 0 || dropped_keyword > 0 {
            warn!(
                dropped_semantic,
                dropped_keyword, "Dropped non-finite scores before fusion"
            );
        }

        let ranked = self.fusion.rank(&semantic, &keyword);
        info!(
            semantic_candidates = semantic.len(),
            keyword_candidates = keyword.len(),
            results = ranked.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Hybrid search completed"
        );
        Ok(ranked)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, SearchError> {
        let embeddings = Arc::clone(&self.embeddings);
        let text = query.to_string();
        let embedding = tokio::task::spawn_blocking(move || embeddings.embed_text(&text))
            .await
            .map_err(|err| SearchError::Runtime(err.to_string()))??;

        let expected = self.embeddings.dimension();
        if embedding.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: embedding.len(),
            }
            .into());
        }
        debug!(dimension = expected, "Embedded query");
        Ok(embedding)
    }

    async fn run_lookup<F>(
        &self,
        lookup: Lookup,
        future: F,
    ) -> Result<HashMap<Uuid, f64>, SearchError>
    where
        F: Future<Output = Result<HashMap<Uuid, f64>, SourceError>>,
    {
        let result = match self.lookup_timeout {
            Some(limit) => tokio::time::timeout(limit, future).await.map_err(|_| {
                SearchError::Timeout {
                    lookup,
                    timeout_ms: limit.as_millis() as u64,
                }
            })?,
            None => future.await,
        };

        result.map_err(|source| {
            warn!(%lookup, error = %source, "Lookup failed");
            match lookup {
                Lookup::Semantic => SearchError::Semantic(source),
                Lookup::Keyword => SearchError::Keyword(source),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use hybridrank_core::FusionConfig;

    use super::*;
    use crate::vector::HashEmbedder;

    struct FixedScores(HashMap<Uuid, f64>);

    #[async_trait]
    impl SemanticSource for FixedScores {
        async fn max_similarity(&self, _query: &[f32]) -> Result<HashMap<Uuid, f64>, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[async_trait]
    impl KeywordSource for FixedScores {
        async fn keyword_scores(&self, _query: &str) -> Result<HashMap<Uuid, f64>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl KeywordSource for FailingSource {
        async fn keyword_scores(&self, _query: &str) -> Result<HashMap<Uuid, f64>, SourceError> {
            Err(SourceError::Unavailable("index offline".to_string()))
        }
    }

    struct SlowSource;

    #[async_trait]
    impl SemanticSource for SlowSource {
        async fn max_similarity(&self, _query: &[f32]) -> Result<HashMap<Uuid, f64>, SourceError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(HashMap::new())
        }
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    struct PendingSource(Arc<AtomicBool>);

    #[async_trait]
    impl KeywordSource for PendingSource {
        async fn keyword_scores(&self, _query: &str) -> Result<HashMap<Uuid, f64>, SourceError> {
            let _flag = DropFlag(Arc::clone(&self.0));
            std::future::pending::<Result<HashMap<Uuid, f64>, SourceError>>().await
        }
    }

    fn searcher(semantic: Arc<dyn SemanticSource>, keyword: Arc<dyn KeywordSource>) -> HybridSearcher {
        HybridSearcher::new(
            Arc::new(HashEmbedder::new(16)),
            semantic,
            keyword,
            ScoreFusion::new(FusionConfig::default()).unwrap(),
        )
    }

    fn empty() -> Arc<FixedScores> {
        Arc::new(FixedScores(HashMap::new()))
    }

    #[tokio::test]
    async fn fuses_both_lookups() {
        let both = Uuid::new_v4();
        let semantic_only = Uuid::new_v4();
        let keyword_only = Uuid::new_v4();
        let semantic = Arc::new(FixedScores(HashMap::from([
            (both, 0.8),
            (semantic_only, 0.85),
        ])));
        let keyword = Arc::new(FixedScores(HashMap::from([(both, 2.0), (keyword_only, 0.5)])));

        let ranked = searcher(semantic, keyword).search("  tax  ").await.unwrap();
        let ids: Vec<Uuid> = ranked.iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![both, semantic_only, keyword_only]);
        assert!((ranked[0].score - (0.3 + 0.56)).abs() < 1e-9);
        assert!((ranked[2].score - 0.25).abs() < 1e-9);
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let result = searcher(empty(), empty()).search(" \t ").await;
        assert!(matches!(result, Err(SearchError::BlankQuery)));
    }

    #[tokio::test]
    async fn no_candidates_is_an_empty_ranking() {
        let ranked = searcher(empty(), empty()).search("anything").await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn keyword_failure_is_surfaced() {
        let result = searcher(empty(), Arc::new(FailingSource)).search("tax").await;
        assert!(matches!(
            result,
            Err(SearchError::Keyword(SourceError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn slow_lookup_times_out() {
        let searcher = searcher(Arc::new(SlowSource), empty())
            .with_lookup_timeout(Duration::from_millis(20));
        let result = searcher.search("tax").await;
        assert!(matches!(
            result,
            Err(SearchError::Timeout {
                lookup: Lookup::Semantic,
                timeout_ms: 20
            })
        ));
    }

    #[tokio::test]
    async fn non_finite_semantic_scores_are_dropped() {
        let good = Uuid::new_v4();
        let semantic = Arc::new(FixedScores(HashMap::from([
            (good, 0.9),
            (Uuid::new_v4(), f64::NAN),
            (Uuid::new_v4(), f64::INFINITY),
        ])));
        let ranked = searcher(semantic, empty()).search("tax").await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].item_id, good);
        assert!(ranked[0].score.is_finite());
    }

    #[tokio::test]
    async fn dropping_the_search_cancels_lookups() {
        let dropped = Arc::new(AtomicBool::new(false));
        let searcher = searcher(empty(), Arc::new(PendingSource(Arc::clone(&dropped))));

        let outcome = tokio::time::timeout(Duration::from_millis(50), searcher.search("tax")).await;
        assert!(outcome.is_err());
        assert!(dropped.load(Ordering::SeqCst));
    }
}
