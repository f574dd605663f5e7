use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::corpus::models::{Document, StoredChunk};

#[derive(Default)]
struct Inner {
    documents: HashMap<Uuid, Document>,
    chunks: HashMap<Uuid, Vec<StoredChunk>>,
}

/// Thread-safe in-memory store of documents and their embedded chunks.
///
/// A document and its chunks are inserted and removed under one write lock,
/// so readers never observe chunks without their document.
#[derive(Default)]
pub struct DocumentStore {
    inner: RwLock<Inner>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document and all of its chunks.
    pub fn insert(&self, document: Document, chunks: Vec<StoredChunk>) {
        let mut inner = self.inner.write();
        inner.chunks.insert(document.id, chunks);
        inner.documents.insert(document.id, document);
    }

    /// Inserts a document unless another one already holds its title
    /// (ignoring case and surrounding whitespace).
    ///
    /// The title check and the insert happen under one write lock. On
    /// conflict nothing is written and the existing document is returned.
    pub fn insert_unique(
        &self,
        document: Document,
        chunks: Vec<StoredChunk>,
    ) -> Result<(), Document> {
        let mut inner = self.inner.write();
        let wanted = normalize_title(&document.title);
        if let Some(existing) = inner
            .documents
            .values()
            .find(|doc| doc.id != document.id && normalize_title(&doc.title) == wanted)
        {
            return Err(existing.clone());
        }
        inner.chunks.insert(document.id, chunks);
        inner.documents.insert(document.id, document);
        Ok(())
    }

    pub fn remove(&self, id: &Uuid) -> Option<Document> {
        let mut inner = self.inner.write();
        inner.chunks.remove(id);
        inner.documents.remove(id)
    }

    pub fn get(&self, id: &Uuid) -> Option<Document> {
        self.inner.read().documents.get(id).cloned()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.inner.read().documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().documents.is_empty()
    }

    pub fn chunk_count(&self) -> usize {
        self.inner.read().chunks.values().map(Vec::len).sum()
    }

    /// All documents, oldest first.
    pub fn documents(&self) -> Vec<Document> {
        let mut documents: Vec<Document> = self.inner.read().documents.values().cloned().collect();
        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        documents
    }

    /// Finds a document whose title matches `title`, ignoring case and
    /// surrounding whitespace.
    pub fn find_by_title(&self, title: &str) -> Option<Document> {
        let wanted = normalize_title(title);
        self.inner
            .read()
            .documents
            .values()
            .find(|doc| normalize_title(&doc.title) == wanted)
            .cloned()
    }

    pub(crate) fn with_documents<R>(&self, f: impl FnOnce(&HashMap<Uuid, Document>) -> R) -> R {
        f(&self.inner.read().documents)
    }

    pub(crate) fn with_chunks<R>(
        &self,
        f: impl FnOnce(&HashMap<Uuid, Vec<StoredChunk>>) -> R,
    ) -> R {
        f(&self.inner.read().chunks)
    }
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
