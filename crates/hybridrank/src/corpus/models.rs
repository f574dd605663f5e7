use chrono::{DateTime, Utc};
use hybridrank_core::Chunk;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A searchable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// A chunk of a document together with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredChunk {
    pub document_id: Uuid,
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}
