//! Query-time orchestration: one embedding, two concurrent lookups, one fusion.

pub mod coordinator;
pub mod sources;

pub use coordinator::{HybridSearcher, Lookup, SearchError};
pub use sources::{KeywordSource, SemanticSource, SourceError};
