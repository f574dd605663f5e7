//! Semantic + keyword score fusion.

pub mod error;
pub mod models;
pub mod normalize;
pub mod ranker;

pub use error::FusionError;
pub use models::{FusionConfig, RawKeywordScores, ScoredItem, SemanticScores};
pub use normalize::{normalize_keyword_scores, sanitize_keyword_scores, sanitize_semantic_scores};
pub use ranker::ScoreFusion;
