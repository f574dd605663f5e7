//! Term extraction shared by the hashing embedder and in-memory keyword matching.

use unicode_segmentation::UnicodeSegmentation;

/// Lowercased Unicode words of `text`.
pub fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words().map(str::to_lowercase)
}

/// Distinct query terms in first-seen order.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for term in terms(query) {
        if !seen.contains(&term) {
            seen.push(term);
        }
    }
    seen
}
