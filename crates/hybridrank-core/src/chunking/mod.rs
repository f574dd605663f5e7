//! Word-window chunking used before documents are embedded.

pub use self::{
    chunker::{chunk_text, split_words, Chunk, Chunker, ChunkingConfig},
    errors::{ChunkingError, ChunkingResult},
};

mod chunker;
mod errors;
