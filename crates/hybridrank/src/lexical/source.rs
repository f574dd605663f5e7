use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    lexical::{errors::LexicalError, index::LexicalIndex},
    search::sources::{KeywordSource, SourceError},
};

/// Default number of BM25 hits fetched per query.
pub const DEFAULT_KEYWORD_LIMIT: usize = 1000;

/// [`KeywordSource`] answering from a [`LexicalIndex`].
///
/// Returns raw BM25 scores; fusion normalizes them against the best match.
pub struct LexicalKeywordSource {
    index: Arc<LexicalIndex>,
    limit: usize,
}

impl LexicalKeywordSource {
    pub fn new(index: Arc<LexicalIndex>) -> Self {
        Self {
            index,
            limit: DEFAULT_KEYWORD_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl From<LexicalError> for SourceError {
    fn from(err: LexicalError) -> Self {
        SourceError::Backend(err.to_string())
    }
}

#[async_trait]
impl KeywordSource for LexicalKeywordSource {
    async fn keyword_scores(&self, query: &str) -> Result<HashMap<Uuid, f64>, SourceError> {
        let index = Arc::clone(&self.index);
        let query = query.to_string();
        let limit = self.limit;
        let hits = tokio::task::spawn_blocking(move || index.search(&query, limit))
            .await
            .map_err(|err| SourceError::from(LexicalError::Runtime(err.to_string())))??;

        let mut scores: HashMap<Uuid, f64> = HashMap::with_capacity(hits.len());
        for hit in hits {
            let score = f64::from(hit.score);
            scores
                .entry(hit.document_id)
                .and_modify(|current| *current = current.max(score))
                .or_insert(score);
        }
        Ok(scores)
    }
}
