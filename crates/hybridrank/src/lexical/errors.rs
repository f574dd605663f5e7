use thiserror::Error;

pub type LexicalResult<T> = Result<T, LexicalError>;

#[derive(Debug, Error)]
pub enum LexicalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("Index directory error: {0}")]
    Directory(String),

    #[error("Async runtime error: {0}")]
    Runtime(String),
}
