use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use parking_lot::Mutex;
use tantivy::{
    collector::TopDocs,
    directory::MmapDirectory,
    doc,
    indexer::IndexWriter,
    query::QueryParser,
    schema::{document::TantivyDocument, Value},
    Index, IndexReader, ReloadPolicy, Term,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    corpus::Document,
    lexical::{
        errors::{LexicalError, LexicalResult},
        schema::{LexicalSchema, TITLE_BOOST},
    },
};

const WRITER_HEAP_BYTES: usize = 50_000_000;

/// A scored document returned by [`LexicalIndex::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalHit {
    pub document_id: Uuid,
    pub score: f32,
}

/// BM25 index over document titles and contents.
///
/// Writes become visible to searches after [`LexicalIndex::commit`].
pub struct LexicalIndex {
    schema: LexicalSchema,
    index: Index,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    directory_path: Option<PathBuf>,
}

impl LexicalIndex {
    pub fn open_in_ram() -> LexicalResult<Self> {
        let schema = LexicalSchema::build();
        let index = Index::create_in_ram(schema.schema().clone());
        Self::from_index(schema, index, None)
    }

    /// Opens the index stored in `directory`, creating it when absent.
    pub fn open_in_dir<P: AsRef<Path>>(directory: P) -> LexicalResult<Self> {
        let directory_path = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory_path)?;
        let mmap = MmapDirectory::open(&directory_path)
            .map_err(|err| LexicalError::Directory(err.to_string()))?;
        let schema = LexicalSchema::build();
        let index = Index::open_or_create(mmap, schema.schema().clone())?;
        info!(path = %directory_path.display(), "Opened lexical index");
        Self::from_index(schema, index, Some(directory_path))
    }

    fn from_index(
        schema: LexicalSchema,
        index: Index,
        directory_path: Option<PathBuf>,
    ) -> LexicalResult<Self> {
        let writer = index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(Self {
            schema,
            index,
            reader,
            writer: Mutex::new(writer),
            directory_path,
        })
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory_path.as_deref()
    }

    /// Stages `document`, replacing any earlier version with the same id.
    pub fn add_document(&self, document: &Document) -> LexicalResult<()> {
        let writer = self.writer.lock();
        writer.delete_term(self.id_term(&document.id));
        writer.add_document(doc!(
            self.schema.document_id_field => document.id.to_string(),
            self.schema.title_field => document.title.clone(),
            self.schema.content_field => document.content.clone(),
        ))?;
        Ok(())
    }

    pub fn remove_document(&self, id: &Uuid) -> LexicalResult<()> {
        let writer = self.writer.lock();
        writer.delete_term(self.id_term(id));
        Ok(())
    }

    /// Drops every indexed document and commits.
    pub fn clear(&self) -> LexicalResult<()> {
        {
            let writer = self.writer.lock();
            writer.delete_all_documents()?;
        }
        self.commit()
    }

    /// Persists staged changes and refreshes the searcher.
    pub fn commit(&self) -> LexicalResult<()> {
        let mut writer = self.writer.lock();
        writer.commit()?;
        self.reader.reload()?;
        debug!(documents = self.num_docs(), "Committed lexical index");
        Ok(())
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Top `limit` documents by BM25, title matches boosted.
    ///
    /// Query syntax errors are tolerated: the parseable part of the query is
    /// used and the rest is ignored.
    pub fn search(&self, query: &str, limit: usize) -> LexicalResult<Vec<LexicalHit>> {
        if limit == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let searcher = self.reader.searcher();
        let mut parser = QueryParser::for_index(
            &self.index,
            vec![self.schema.title_field, self.schema.content_field],
        );
        parser.set_field_boost(self.schema.title_field, TITLE_BOOST);
        let (parsed, errors) = parser.parse_query_lenient(query);
        if !errors.is_empty() {
            debug!(errors = errors.len(), "Ignored unparseable query fragments");
        }

        let top_docs = searcher.search(&parsed, &TopDocs::with_limit(limit))?;
        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let retrieved: TantivyDocument = searcher.doc(address)?;
            let document_id = retrieved
                .get_first(self.schema.document_id_field)
                .and_then(|value| value.as_str())
                .and_then(|raw| Uuid::parse_str(raw).ok());
            match document_id {
                Some(document_id) => hits.push(LexicalHit { document_id, score }),
                None => warn!("Skipping indexed document without a valid id"),
            }
        }

        debug!(
            hits = hits.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Lexical search completed"
        );
        Ok(hits)
    }

    fn id_term(&self, id: &Uuid) -> Term {
        Term::from_field_text(self.schema.document_id_field, &id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed(docs: &[&Document]) -> LexicalIndex {
        let index = LexicalIndex::open_in_ram().unwrap();
        for doc in docs {
            index.add_document(doc).unwrap();
        }
        index.commit().unwrap();
        index
    }

    #[test]
    fn finds_documents_by_content_and_title() {
        let tax = Document::new("Tax Return 2023", "annual income statement");
        let bill = Document::new("Utility Bill", "electricity charges for march");
        let index = indexed(&[&tax, &bill]);

        let hits = index.search("electricity", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document_id, bill.id);
        assert!(hits[0].score > 0.0);

        let hits = index.search("tax", 10).unwrap();
        assert_eq!(hits[0].document_id, tax.id);
    }

    #[test]
    fn title_matches_outrank_content_matches() {
        let titled = Document::new("Passport", "copy of identity page");
        let mentioned = Document::new("Travel notes", "remember the passport page");
        let index = indexed(&[&titled, &mentioned]);

        let hits = index.search("passport", 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document_id, titled.id);
    }

    #[test]
    fn malformed_queries_do_not_fail() {
        let doc = Document::new("Notes", "bracket test");
        let index = indexed(&[&doc]);
        let hits = index.search("bracket AND (", 10).unwrap();
        assert!(hits.iter().all(|hit| hit.document_id == doc.id));
        assert!(index.search("   ", 10).unwrap().is_empty());
        assert!(index.search("bracket", 0).unwrap().is_empty());
    }

    #[test]
    fn removal_and_replacement_are_visible_after_commit() {
        let mut doc = Document::new("Invoice", "payment due");
        let index = indexed(&[&doc]);
        assert_eq!(index.num_docs(), 1);

        doc.content = "settled in full".to_string();
        index.add_document(&doc).unwrap();
        index.commit().unwrap();
        assert_eq!(index.num_docs(), 1);
        assert!(index.search("due", 10).unwrap().is_empty());
        assert_eq!(index.search("settled", 10).unwrap().len(), 1);

        index.remove_document(&doc.id).unwrap();
        assert_eq!(index.search("settled", 10).unwrap().len(), 1);
        index.commit().unwrap();
        assert!(index.search("settled", 10).unwrap().is_empty());
    }

    #[test]
    fn on_disk_index_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::new("Mortgage", "fixed rate agreement");
        {
            let index = LexicalIndex::open_in_dir(dir.path()).unwrap();
            index.add_document(&doc).unwrap();
            index.commit().unwrap();
        }

        let reopened = LexicalIndex::open_in_dir(dir.path()).unwrap();
        assert_eq!(reopened.directory(), Some(dir.path()));
        let hits = reopened.search("mortgage", 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document_id, doc.id);

        reopened.clear().unwrap();
        assert_eq!(reopened.num_docs(), 0);
    }
}
