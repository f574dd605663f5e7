//! Embedding providers and vector similarity.

pub mod embeddings;
pub mod similarity;

#[cfg(feature = "local-embeddings")]
pub mod local;

pub use embeddings::{
    EmbeddingBackend, EmbeddingConfig, EmbeddingError, EmbeddingModel, EmbeddingProvider,
    HashEmbedder,
};
pub use similarity::{cosine_similarity, normalize};

#[cfg(feature = "local-embeddings")]
pub use local::FastEmbedProvider;
