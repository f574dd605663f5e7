use thiserror::Error;

pub type ChunkingResult<T> = Result<T, ChunkingError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkingError {
    #[error("invalid chunking configuration: {0}")]
    InvalidConfig(String),
}
