//! Tantivy BM25 keyword path.

pub mod errors;
pub mod index;
pub mod schema;
pub mod source;

pub use errors::{LexicalError, LexicalResult};
pub use index::{LexicalHit, LexicalIndex};
pub use schema::LexicalSchema;
pub use source::LexicalKeywordSource;
