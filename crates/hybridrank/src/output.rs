//! Text and JSON rendering for CLI results.

use std::fmt::Write as _;

use hybridrank_core::Chunk;

use crate::engine::SearchHit;

const PREVIEW_CHARS: usize = 72;

pub fn format_hits(hits: &[SearchHit], json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(hits);
    }
    if hits.is_empty() {
        return Ok("No matching documents".to_string());
    }

    let mut out = String::new();
    for hit in hits {
        let _ = writeln!(out, "{:.4}  {}  {}", hit.score, hit.title, hit.document_id);
    }
    Ok(out.trim_end().to_string())
}

pub fn format_chunks(chunks: &[Chunk], json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(chunks);
    }

    let mut out = String::new();
    for chunk in chunks {
        let _ = writeln!(
            out,
            "#{} words {}..{} ({}): {}",
            chunk.index,
            chunk.word_range.start,
            chunk.word_range.end,
            chunk.word_count(),
            preview(&chunk.text)
        );
    }
    Ok(out.trim_end().to_string())
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
