//! In-memory document corpus and its two lookup implementations.

pub mod models;
pub mod sources;
pub mod store;

pub use models::{Document, StoredChunk};
pub use sources::{MemoryKeywordSource, MemorySemanticSource, DEFAULT_CANDIDATE_CHUNKS};
pub use store::DocumentStore;
