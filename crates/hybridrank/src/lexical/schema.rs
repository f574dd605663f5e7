use tantivy::schema::{Field, Schema, SchemaBuilder, STORED, STRING, TEXT};

/// Relevance multiplier applied to title matches.
pub const TITLE_BOOST: f32 = 2.0;

/// Tantivy schema for document-level BM25 indexing.
#[derive(Clone)]
pub struct LexicalSchema {
    schema: Schema,
    pub document_id_field: Field,
    pub title_field: Field,
    pub content_field: Field,
}

impl LexicalSchema {
    pub fn build() -> Self {
        let mut builder = SchemaBuilder::default();
        // Raw (untokenized) so a document can be deleted by exact id term.
        let document_id_field = builder.add_text_field("document_id", STRING | STORED);
        let title_field = builder.add_text_field("title", TEXT);
        let content_field = builder.add_text_field("content", TEXT);

        Self {
            schema: builder.build(),
            document_id_field,
            title_field,
            content_field,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}
