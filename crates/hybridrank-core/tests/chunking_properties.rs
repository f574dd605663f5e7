// Property-based tests for the word-window chunker
// Covers: single-chunk bound, tail merge, overlap law, full coverage

use hybridrank_core::{chunk_text, split_words, Chunker, ChunkingConfig};
use proptest::prelude::*;

fn arb_document(words: std::ops::Range<usize>) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", words)
}

fn join_with_noise(words: &[String], separators: &[&str]) -> String {
    let mut text = String::from("  ");
    for (i, word) in words.iter().enumerate() {
        text.push_str(word);
        text.push_str(separators[i % separators.len()]);
    }
    text
}

proptest! {
    #[test]
    fn prop_short_documents_are_one_normalized_chunk(words in arb_document(1..151)) {
        let text = join_with_noise(&words, &[" ", "\t", "\n  "]);
        let chunks = chunk_text(&text);
        prop_assert_eq!(chunks.len(), 1);
        prop_assert_eq!(&chunks[0].text, &words.join(" "));
        prop_assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn prop_remainder_under_minimum_merges_back(words in arb_document(151..175)) {
        let chunks = chunk_text(&words.join(" "));
        prop_assert_eq!(chunks.len(), 1);
        prop_assert_eq!(chunks[0].word_range.clone(), 0..words.len());
    }

    #[test]
    fn prop_long_documents_keep_a_full_tail(words in arb_document(175..900)) {
        let chunks = chunk_text(&words.join(" "));
        prop_assert!(chunks.len() >= 2);
        let last = chunks.last().unwrap();
        prop_assert!(last.word_count() >= 50);
        prop_assert_eq!(last.word_range.end, words.len());
    }

    #[test]
    fn prop_consecutive_chunks_share_overlap(words in arb_document(151..900)) {
        let chunks = chunk_text(&words.join(" "));
        for pair in chunks.windows(2) {
            let current: Vec<&str> = pair[0].text.split(' ').collect();
            let next: Vec<&str> = pair[1].text.split(' ').collect();
            prop_assert_eq!(&current[current.len() - 25..], &next[..25]);
        }
    }

    #[test]
    fn prop_chunks_cover_every_word_in_order(words in arb_document(0..900)) {
        let text = words.join(" ");
        let chunks = chunk_text(&text);
        prop_assert!(!chunks.is_empty());
        prop_assert_eq!(chunks[0].word_range.start, 0);
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
        }
        for pair in chunks.windows(2) {
            prop_assert!(pair[1].word_range.start < pair[0].word_range.end);
        }
        prop_assert_eq!(chunks.last().unwrap().word_range.end, split_words(&text).len());
    }

    #[test]
    fn prop_chunking_is_deterministic(
        words in arb_document(0..600),
        window in 2usize..60,
        overlap_seed in 0usize..60,
        min_tail in 0usize..40,
    ) {
        let config = ChunkingConfig {
            window_words: window,
            overlap_words: overlap_seed % window,
            min_tail_words: min_tail,
        };
        let chunker = Chunker::new(config).unwrap();
        let text = words.join(" ");
        prop_assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
    }
}

#[test]
fn scenario_thousand_words() {
    let text = vec!["word"; 1000].join(" ");
    let chunks = chunk_text(&text);
    assert_eq!(chunks.len(), 8);
    let starts: Vec<usize> = chunks.iter().map(|c| c.word_range.start).collect();
    assert_eq!(starts, vec![0, 125, 250, 375, 500, 625, 750, 875]);
}
