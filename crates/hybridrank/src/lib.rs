//! hybridrank - hybrid semantic + keyword document retrieval
//!
//! Documents are split into overlapping word windows, each window is embedded,
//! and queries are answered by fusing the best-chunk vector similarity of every
//! document with its lexical relevance. Ranking policy lives in
//! [`hybridrank_core`]; this crate wires it to embedding providers, document
//! stores and keyword indexes.

pub mod args;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod ingest;
pub mod lexical;
pub mod loader;
pub mod logging;
pub mod output;
pub mod search;
pub mod tokenizer;
pub mod vector;

pub use config::{ConfigError, HybridRankConfig, KeywordBackend, SearchConfig};
pub use corpus::{Document, DocumentStore, MemoryKeywordSource, MemorySemanticSource, StoredChunk};
pub use engine::{EngineError, HybridRank, SearchHit};
pub use ingest::{IngestError, IngestReport, Ingestor};
pub use lexical::{LexicalError, LexicalHit, LexicalIndex, LexicalKeywordSource};
pub use loader::{load_documents, SourceDocument};
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
pub use search::{HybridSearcher, KeywordSource, Lookup, SearchError, SemanticSource, SourceError};
pub use vector::{
    cosine_similarity, EmbeddingBackend, EmbeddingConfig, EmbeddingError, EmbeddingModel,
    EmbeddingProvider, HashEmbedder,
};

pub use hybridrank_core::{Chunk, ChunkingConfig, FusionConfig, ScoreFusion, ScoredItem};
