//! Document ingestion: chunk, embed, store, index.

use std::sync::Arc;

use hybridrank_core::Chunker;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    corpus::{Document, DocumentStore, StoredChunk},
    lexical::{LexicalError, LexicalIndex},
    vector::{EmbeddingError, EmbeddingProvider},
};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid document: {0}")]
    Validation(String),
    #[error("a document titled '{title}' already exists ({existing})")]
    DuplicateTitle { title: String, existing: Uuid },
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("lexical indexing failed: {0}")]
    Lexical(#[from] LexicalError),
    #[error("async runtime error: {0}")]
    Runtime(String),
}

/// Outcome of ingesting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub document_id: Uuid,
    pub chunk_count: usize,
}

/// Writes documents into the store and, when configured, the lexical index.
pub struct Ingestor {
    chunker: Chunker,
    embeddings: Arc<dyn EmbeddingProvider>,
    store: Arc<DocumentStore>,
    lexical: Option<Arc<LexicalIndex>>,
}

impl Ingestor {
    pub fn new(
        chunker: Chunker,
        embeddings: Arc<dyn EmbeddingProvider>,
        store: Arc<DocumentStore>,
    ) -> Self {
        Self {
            chunker,
            embeddings,
            store,
            lexical: None,
        }
    }

    pub fn with_lexical_index(mut self, index: Arc<LexicalIndex>) -> Self {
        self.lexical = Some(index);
        self
    }

    pub async fn ingest(&self, title: &str, content: &str) -> Result<IngestReport, IngestError> {
        let document = self.prepare(title, content)?;
        self.write(document).await
    }

    /// Ingests every `(title, content)` pair, committing the lexical index
    /// once at the end. Stops at the first failure; documents ingested
    /// before it stay ingested and are committed.
    pub async fn ingest_many<I, T, C>(&self, documents: I) -> Result<Vec<IngestReport>, IngestError>
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: AsRef<str>,
    {
        let mut reports = Vec::new();
        let outcome = self.ingest_each(documents, &mut reports).await;
        let committed = self.commit_lexical().await;
        if let Err(err) = &outcome {
            warn!(ingested = reports.len(), error = %err, "Batch ingestion stopped early");
        }
        outcome?;
        committed?;
        info!(documents = reports.len(), "Batch ingestion completed");
        Ok(reports)
    }

    /// Removes a document from the lexical index and then the store.
    ///
    /// Returns `false` when no such document exists. If the index update
    /// fails the document is left in the store.
    pub async fn remove(&self, id: &Uuid) -> Result<bool, IngestError> {
        if !self.store.contains(id) {
            return Ok(false);
        }
        if let Some(index) = &self.lexical {
            index.remove_document(id)?;
            self.commit_lexical().await?;
        }
        let Some(document) = self.store.remove(id) else {
            return Ok(false);
        };
        info!(document_id = %id, title = %document.title, "Removed document");
        Ok(true)
    }

    async fn ingest_each<I, T, C>(
        &self,
        documents: I,
        reports: &mut Vec<IngestReport>,
    ) -> Result<(), IngestError>
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: AsRef<str>,
    {
        for (title, content) in documents {
            let document = self.prepare(title.as_ref(), content.as_ref())?;
            let stored = self.embed(&document).await?;
            reports.push(self.store_document(document, stored)?);
        }
        Ok(())
    }

    fn prepare(&self, title: &str, content: &str) -> Result<Document, IngestError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(IngestError::Validation("title must not be blank".to_string()));
        }
        if content.trim().is_empty() {
            return Err(IngestError::Validation("content must not be blank".to_string()));
        }
        if let Some(existing) = self.store.find_by_title(title) {
            return Err(IngestError::DuplicateTitle {
                title: title.to_string(),
                existing: existing.id,
            });
        }
        Ok(Document::new(title, content))
    }

    async fn write(&self, document: Document) -> Result<IngestReport, IngestError> {
        let stored = self.embed(&document).await?;
        let report = self.store_document(document, stored)?;
        self.commit_lexical().await?;
        Ok(report)
    }

    async fn embed(&self, document: &Document) -> Result<Vec<StoredChunk>, IngestError> {
        let chunker = self.chunker;
        let embeddings = Arc::clone(&self.embeddings);
        let document_id = document.id;
        let content = document.content.clone();

        tokio::task::spawn_blocking(move || {
            chunker
                .chunk(&content)
                .into_iter()
                .map(|chunk| -> Result<StoredChunk, EmbeddingError> {
                    let embedding = embeddings.embed_text(&chunk.text)?;
                    Ok(StoredChunk {
                        document_id,
                        chunk,
                        embedding,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(|err| IngestError::Runtime(err.to_string()))?
        .map_err(IngestError::from)
    }

    /// Inserts into the store, re-checking the title under the store's write
    /// lock, then stages the lexical add.
    fn store_document(
        &self,
        document: Document,
        chunks: Vec<StoredChunk>,
    ) -> Result<IngestReport, IngestError> {
        let report = IngestReport {
            document_id: document.id,
            chunk_count: chunks.len(),
        };
        let title = document.title.clone();
        let indexed = self.lexical.is_some().then(|| document.clone());

        self.store
            .insert_unique(document, chunks)
            .map_err(|existing| IngestError::DuplicateTitle {
                title: title.clone(),
                existing: existing.id,
            })?;
        if let (Some(index), Some(document)) = (&self.lexical, indexed) {
            if let Err(err) = index.add_document(&document) {
                self.store.remove(&report.document_id);
                return Err(err.into());
            }
        }

        info!(
            document_id = %report.document_id,
            title = %title,
            chunks = report.chunk_count,
            "Ingested document"
        );
        Ok(report)
    }

    async fn commit_lexical(&self) -> Result<(), IngestError> {
        let Some(index) = self.lexical.clone() else {
            return Ok(());
        };
        tokio::task::spawn_blocking(move || index.commit())
            .await
            .map_err(|err| IngestError::Runtime(err.to_string()))??;
        Ok(())
    }
}
