//! Wires configuration into a ready-to-use ingest + search service.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use hybridrank_core::{Chunker, ChunkingError, FusionError, ScoreFusion};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::{HybridRankConfig, KeywordBackend},
    corpus::{Document, DocumentStore, MemoryKeywordSource, MemorySemanticSource},
    ingest::{IngestError, IngestReport, Ingestor},
    lexical::{LexicalError, LexicalIndex, LexicalKeywordSource},
    search::{HybridSearcher, KeywordSource, SearchError},
    vector::{EmbeddingError, EmbeddingModel},
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Chunking(#[from] ChunkingError),
    #[error(transparent)]
    Fusion(#[from] FusionError),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// A ranked document ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub document_id: Uuid,
    pub title: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

/// In-process hybrid retrieval service.
///
/// Documents live in memory. When the keyword backend is lexical and
/// `search.index_dir` is set, the on-disk index is emptied at startup so it
/// mirrors the store.
pub struct HybridRank {
    config: HybridRankConfig,
    model: Arc<EmbeddingModel>,
    store: Arc<DocumentStore>,
    ingestor: Ingestor,
    searcher: HybridSearcher,
}

impl HybridRank {
    pub fn start(config: HybridRankConfig) -> Result<Self, EngineError> {
        let chunker = Chunker::new(config.chunking)?;
        let fusion = ScoreFusion::new(config.fusion)?;
        let model = EmbeddingModel::start(&config.embedding)?;
        let store = Arc::new(DocumentStore::new());

        let lexical = match config.search.keyword_backend {
            KeywordBackend::Lexical => {
                let index = match &config.search.index_dir {
                    Some(dir) => {
                        let index = LexicalIndex::open_in_dir(dir)?;
                        index.clear()?;
                        index
                    }
                    None => LexicalIndex::open_in_ram()?,
                };
                Some(Arc::new(index))
            }
            KeywordBackend::Memory => None,
        };

        let mut ingestor = Ingestor::new(chunker, model.clone(), Arc::clone(&store));
        let keyword: Arc<dyn KeywordSource> = match &lexical {
            Some(index) => {
                ingestor = ingestor.with_lexical_index(Arc::clone(index));
                Arc::new(
                    LexicalKeywordSource::new(Arc::clone(index))
                        .with_limit(config.search.keyword_limit),
                )
            }
            None => Arc::new(MemoryKeywordSource::new(Arc::clone(&store))),
        };
        let semantic = Arc::new(
            MemorySemanticSource::new(Arc::clone(&store))
                .with_candidate_chunks(config.search.candidate_chunks),
        );

        let mut searcher = HybridSearcher::new(model.clone(), semantic, keyword, fusion);
        if let Some(ms) = config.search.lookup_timeout_ms {
            searcher = searcher.with_lookup_timeout(Duration::from_millis(ms));
        }

        info!(
            keyword_backend = ?config.search.keyword_backend,
            embedding_backend = ?model.backend(),
            "Hybrid search engine started"
        );
        Ok(Self {
            config,
            model,
            store,
            ingestor,
            searcher,
        })
    }

    pub fn config(&self) -> &HybridRankConfig {
        &self.config
    }

    pub fn documents(&self) -> Vec<Document> {
        self.store.documents()
    }

    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    pub async fn ingest(&self, title: &str, content: &str) -> Result<IngestReport, EngineError> {
        Ok(self.ingestor.ingest(title, content).await?)
    }

    pub async fn ingest_many<I, T, C>(&self, documents: I) -> Result<Vec<IngestReport>, EngineError>
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: AsRef<str>,
    {
        Ok(self.ingestor.ingest_many(documents).await?)
    }

    pub async fn remove(&self, id: &Uuid) -> Result<bool, EngineError> {
        Ok(self.ingestor.remove(id).await?)
    }

    /// Ranks documents for `query`, returning at most `limit` hits when given.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchHit>, EngineError> {
        let ranked = self.searcher.search(query).await?;
        let hits = ranked
            .into_iter()
            // A document removed mid-query has nothing left to show.
            .filter_map(|item| {
                self.store.get(&item.item_id).map(|doc| SearchHit {
                    document_id: doc.id,
                    title: doc.title,
                    score: item.score,
                    created_at: doc.created_at,
                })
            })
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Ok(hits)
    }

    /// Releases the embedding model. Later ingests and searches fail.
    pub fn shutdown(&self) {
        self.model.shutdown();
        info!("Hybrid search engine stopped");
    }
}
