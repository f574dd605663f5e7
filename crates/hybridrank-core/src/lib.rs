//! hybridrank Core Library
//!
//! Pure ranking logic shared by every hybridrank data access path:
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Consumers (CLI, service, tests)    │
//! ├─────────────────────────────────────┤
//! │  Orchestration (hybridrank crate)   │  ← embedding, lookups, stores
//! ├─────────────────────────────────────┤
//! │  Core (this crate)                  │  ← chunking + score fusion
//! └─────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`chunking`] - splits documents into overlapping word windows for embedding
//! - [`fusion`] - merges semantic and keyword scores into one thresholded ranking
//!
//! Both are synchronous, allocation-only functions with no shared state, so
//! they can be called from any number of threads without locking.
//!
//! # Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use hybridrank_core::{chunk_text, FusionConfig, ScoreFusion};
//!
//! let chunks = chunk_text("a short document");
//! assert_eq!(chunks.len(), 1);
//!
//! let fusion = ScoreFusion::new(FusionConfig::default()).unwrap();
//! let semantic = HashMap::from([("doc-a", 0.85)]);
//! let keyword: HashMap<&str, f64> = HashMap::new();
//! let ranked = fusion.rank(&semantic, &keyword);
//! assert_eq!(ranked[0].item_id, "doc-a");
//! ```

pub mod chunking;
pub mod fusion;

pub use chunking::{chunk_text, split_words, Chunk, Chunker, ChunkingConfig, ChunkingError};
pub use fusion::{
    normalize_keyword_scores, sanitize_keyword_scores, sanitize_semantic_scores, FusionConfig,
    FusionError, RawKeywordScores, ScoreFusion, ScoredItem, SemanticScores,
};
