use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("invalid lookup input: {0}")]
    InvalidQuery(String),
    #[error("vector dimension mismatch: query has {query}, stored chunk has {stored}")]
    DimensionMismatch { query: usize, stored: usize },
    #[error("backend error: {0}")]
    Backend(String),
}

/// Nearest-neighbour lookup over chunk embeddings.
#[async_trait]
pub trait SemanticSource: Send + Sync {
    /// Per document, the best similarity (`1 - cosine distance`) across its chunks.
    async fn max_similarity(&self, query: &[f32]) -> Result<HashMap<Uuid, f64>, SourceError>;
}

/// Lexical lookup returning raw, non-negative relevance per document.
///
/// Documents without any lexical match must be absent from the map.
#[async_trait]
pub trait KeywordSource: Send + Sync {
    async fn keyword_scores(&self, query: &str) -> Result<HashMap<Uuid, f64>, SourceError>;
}
