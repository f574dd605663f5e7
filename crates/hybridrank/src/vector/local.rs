//! all-MiniLM-L6-v2 embeddings through fastembed (ONNX Runtime).

use std::path::PathBuf;

use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use tracing::info;

use crate::vector::{
    embeddings::{EmbeddingError, EmbeddingProvider, DEFAULT_DIMENSION},
    similarity::normalize,
};

pub struct FastEmbedProvider {
    model: Mutex<TextEmbedding>,
}

impl FastEmbedProvider {
    /// Loads the model, downloading it into `cache_dir` on first use.
    pub fn load(cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
        let mut options = InitOptions::new(FastEmbedModel::AllMiniLML6V2);
        if let Some(dir) = cache_dir {
            info!(cache_dir = %dir.display(), "Using embedding model cache");
            options = options.with_cache_dir(dir);
        }
        let model = TextEmbedding::try_new(options)
            .map_err(|err| EmbeddingError::Inference(format!("loading model: {err}")))?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn dimension(&self) -> usize {
        DEFAULT_DIMENSION
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embeddings = self
            .model
            .lock()
            .embed(vec![text], None)
            .map_err(|err| EmbeddingError::Inference(err.to_string()))?;
        let mut embedding = embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::Inference("model returned no embedding".to_string()))?;
        normalize(&mut embedding);
        Ok(embedding)
    }
}
