use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::{
    corpus::store::DocumentStore,
    search::sources::{KeywordSource, SemanticSource, SourceError},
    tokenizer,
    vector::cosine_similarity,
};

/// Chunks considered before per-document aggregation.
pub const DEFAULT_CANDIDATE_CHUNKS: usize = 100;

/// Brute-force vector lookup over every stored chunk.
///
/// With a `candidate_chunks` bound only the globally best chunks are
/// aggregated, so a document whose only good chunk ranks below the cutoff is
/// missed.
pub struct MemorySemanticSource {
    store: Arc<DocumentStore>,
    candidate_chunks: Option<usize>,
}

impl MemorySemanticSource {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            candidate_chunks: Some(DEFAULT_CANDIDATE_CHUNKS),
        }
    }

    pub fn with_candidate_chunks(mut self, candidate_chunks: Option<usize>) -> Self {
        self.candidate_chunks = candidate_chunks;
        self
    }

    fn chunk_similarities(&self, query: &[f32]) -> Result<Vec<(Uuid, f64)>, SourceError> {
        self.store.with_chunks(|chunks| {
            let mut scored = Vec::new();
            for stored in chunks.values().flatten() {
                if stored.embedding.len() != query.len() {
                    return Err(SourceError::DimensionMismatch {
                        query: query.len(),
                        stored: stored.embedding.len(),
                    });
                }
                // Zero-norm vectors have no direction to compare.
                if let Some(similarity) = cosine_similarity(query, &stored.embedding) {
                    scored.push((stored.document_id, f64::from(similarity)));
                }
            }
            Ok(scored)
        })
    }
}

#[async_trait]
impl SemanticSource for MemorySemanticSource {
    async fn max_similarity(&self, query: &[f32]) -> Result<HashMap<Uuid, f64>, SourceError> {
        let mut scored = self.chunk_similarities(query)?;
        let total = scored.len();

        if let Some(limit) = self.candidate_chunks {
            scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            scored.truncate(limit);
        }

        let mut best: HashMap<Uuid, f64> = HashMap::new();
        for (document_id, similarity) in scored {
            best.entry(document_id)
                .and_modify(|current| *current = current.max(similarity))
                .or_insert(similarity);
        }

        debug!(
            chunks = total,
            documents = best.len(),
            candidate_chunks = ?self.candidate_chunks,
            "Semantic lookup completed"
        );
        Ok(best)
    }
}

/// Term-matching keyword lookup over titles and contents.
///
/// Raw score is `(2 * title hits + content hits) / ln(e + content words)`.
/// Documents with no hits are absent from the result.
pub struct MemoryKeywordSource {
    store: Arc<DocumentStore>,
}

impl MemoryKeywordSource {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

fn count_hits(text: &str, terms: &[String]) -> (usize, usize) {
    let mut hits = 0;
    let mut words = 0;
    for word in tokenizer::terms(text) {
        words += 1;
        if terms.contains(&word) {
            hits += 1;
        }
    }
    (hits, words)
}

#[async_trait]
impl KeywordSource for MemoryKeywordSource {
    async fn keyword_scores(&self, query: &str) -> Result<HashMap<Uuid, f64>, SourceError> {
        let terms = tokenizer::query_terms(query);
        if terms.is_empty() {
            return Ok(HashMap::new());
        }

        let scores = self.store.with_documents(|documents| {
            documents
                .values()
                .filter_map(|doc| {
                    let (title_hits, _) = count_hits(&doc.title, &terms);
                    let (content_hits, content_words) = count_hits(&doc.content, &terms);
                    let hits = 2 * title_hits + content_hits;
                    if hits == 0 {
                        return None;
                    }
                    let length_norm = (std::f64::consts::E + content_words as f64).ln();
                    Some((doc.id, hits as f64 / length_norm))
                })
                .collect::<HashMap<Uuid, f64>>()
        });

        debug!(terms = terms.len(), matches = scores.len(), "Keyword lookup completed");
        Ok(scores)
    }
}
