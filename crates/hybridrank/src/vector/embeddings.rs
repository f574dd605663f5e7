use std::{path::PathBuf, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{tokenizer, vector::similarity::normalize};

/// Output size of all-MiniLM-L6-v2, also used by the hashing embedder.
pub const DEFAULT_DIMENSION: usize = 384;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model is not running")]
    Unavailable,
    #[error("embedding inference failed: {0}")]
    Inference(String),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("invalid embedding configuration: {0}")]
    InvalidConfig(String),
}

/// Turns text into a fixed-length unit vector.
///
/// Implementations must be deterministic for identical input within a session.
pub trait EmbeddingProvider: Send + Sync {
    fn dimension(&self) -> usize;
    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Feature-hashed bag of words; no model files required.
    Hash,
    /// all-MiniLM-L6-v2 through fastembed (`local-embeddings` feature).
    FastEmbed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub dimension: usize,
    /// Where downloaded model files are kept.
    pub cache_dir: Option<PathBuf>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Hash,
            dimension: DEFAULT_DIMENSION,
            cache_dir: None,
        }
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.dimension == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "dimension must be greater than 0".to_string(),
            ));
        }
        if self.backend == EmbeddingBackend::FastEmbed && self.dimension != DEFAULT_DIMENSION {
            return Err(EmbeddingError::InvalidConfig(format!(
                "fastembed backend produces {DEFAULT_DIMENSION}-dimensional vectors, configured {}",
                self.dimension
            )));
        }
        Ok(())
    }
}

/// Deterministic feature-hashing embedder.
///
/// Each lowercased term is hashed into a signed bucket; the bucket counts are
/// normalized to unit length. Texts sharing vocabulary get high cosine
/// similarity, which is enough for offline use and tests.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut values = vec![0.0f32; self.dimension];
        for term in tokenizer::terms(text) {
            let hash = fxhash::hash64(term.as_str());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
            values[bucket] += sign;
        }
        normalize(&mut values);
        Ok(values)
    }
}

/// Process-scoped embedding model.
///
/// Acquired once at startup and handed to ingestion and search as an
/// `Arc<dyn EmbeddingProvider>`. After [`EmbeddingModel::shutdown`] every call
/// fails with [`EmbeddingError::Unavailable`].
pub struct EmbeddingModel {
    backend: EmbeddingBackend,
    dimension: usize,
    provider: RwLock<Option<Arc<dyn EmbeddingProvider>>>,
}

impl EmbeddingModel {
    pub fn start(config: &EmbeddingConfig) -> Result<Arc<Self>, EmbeddingError> {
        config.validate()?;
        let provider = Self::load_provider(config)?;
        info!(
            backend = ?config.backend,
            dimension = provider.dimension(),
            "Embedding model started"
        );
        Ok(Arc::new(Self {
            backend: config.backend,
            dimension: provider.dimension(),
            provider: RwLock::new(Some(provider)),
        }))
    }

    /// Wraps an already constructed provider.
    pub fn from_provider(provider: Arc<dyn EmbeddingProvider>) -> Arc<Self> {
        Arc::new(Self {
            backend: EmbeddingBackend::Hash,
            dimension: provider.dimension(),
            provider: RwLock::new(Some(provider)),
        })
    }

    fn load_provider(
        config: &EmbeddingConfig,
    ) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        match config.backend {
            EmbeddingBackend::Hash => Ok(Arc::new(HashEmbedder::new(config.dimension))),
            #[cfg(feature = "local-embeddings")]
            EmbeddingBackend::FastEmbed => Ok(Arc::new(
                crate::vector::local::FastEmbedProvider::load(config.cache_dir.clone())?,
            )),
            #[cfg(not(feature = "local-embeddings"))]
            EmbeddingBackend::FastEmbed => Err(EmbeddingError::InvalidConfig(
                "fastembed backend requires the `local-embeddings` feature".to_string(),
            )),
        }
    }

    pub fn backend(&self) -> EmbeddingBackend {
        self.backend
    }

    pub fn is_running(&self) -> bool {
        self.provider.read().is_some()
    }

    /// Releases the underlying model. Idempotent.
    pub fn shutdown(&self) {
        if self.provider.write().take().is_some() {
            info!(backend = ?self.backend, "Embedding model released");
        }
    }
}

impl EmbeddingProvider for EmbeddingModel {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let provider = self
            .provider
            .read()
            .clone()
            .ok_or(EmbeddingError::Unavailable)?;
        let embedding = provider.embed_text(text)?;
        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::similarity::cosine_similarity;

    #[test]
    fn hash_embeddings_are_deterministic_unit_vectors() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed_text("quarterly tax filing").unwrap();
        let b = embedder.embed_text("quarterly tax filing").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shared_vocabulary_is_more_similar() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed_text("tax return deadline").unwrap();
        let related = embedder.embed_text("the tax return deadline is in april").unwrap();
        let unrelated = embedder.embed_text("chocolate cake recipe").unwrap();
        let close = cosine_similarity(&query, &related).unwrap();
        let far = cosine_similarity(&query, &unrelated).unwrap_or(0.0);
        assert!(close > far);
        assert!(close > 0.5);
    }

    #[test]
    fn blank_text_embeds_to_zero_vector() {
        let embedder = HashEmbedder::new(8);
        assert_eq!(embedder.embed_text("   ").unwrap(), vec![0.0; 8]);
    }

    #[test]
    fn model_rejects_calls_after_shutdown() {
        let model = EmbeddingModel::start(&EmbeddingConfig::default()).unwrap();
        assert!(model.is_running());
        assert_eq!(model.embed_text("hello").unwrap().len(), DEFAULT_DIMENSION);

        model.shutdown();
        model.shutdown();
        assert!(!model.is_running());
        assert!(matches!(
            model.embed_text("hello"),
            Err(EmbeddingError::Unavailable)
        ));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let config = EmbeddingConfig {
            dimension: 0,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            EmbeddingModel::start(&config),
            Err(EmbeddingError::InvalidConfig(_))
        ));
    }

    #[cfg(not(feature = "local-embeddings"))]
    #[test]
    fn fastembed_backend_requires_feature() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::FastEmbed,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            EmbeddingModel::start(&config),
            Err(EmbeddingError::InvalidConfig(_))
        ));
    }
}
