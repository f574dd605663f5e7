use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::chunking::errors::{ChunkingError, ChunkingResult};

/// Default number of words per window.
const DEFAULT_WINDOW_WORDS: usize = 150;
/// Words shared between consecutive windows.
const DEFAULT_OVERLAP_WORDS: usize = 25;
/// A trailing window shorter than this is folded into the previous one.
const DEFAULT_MIN_TAIL_WORDS: usize = 50;

/// Window parameters for the chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub window_words: usize,
    pub overlap_words: usize,
    pub min_tail_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window_words: DEFAULT_WINDOW_WORDS,
            overlap_words: DEFAULT_OVERLAP_WORDS,
            min_tail_words: DEFAULT_MIN_TAIL_WORDS,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> ChunkingResult<()> {
        if self.window_words == 0 {
            return Err(ChunkingError::InvalidConfig(
                "window_words must be greater than 0".to_string(),
            ));
        }
        if self.overlap_words >= self.window_words {
            return Err(ChunkingError::InvalidConfig(format!(
                "overlap_words ({}) must be smaller than window_words ({})",
                self.overlap_words, self.window_words
            )));
        }
        Ok(())
    }

    /// Distance between the starts of two consecutive windows.
    pub fn step(&self) -> usize {
        self.window_words - self.overlap_words
    }
}

/// A contiguous word-range slice of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub word_range: Range<usize>,
}

impl Chunk {
    pub fn word_count(&self) -> usize {
        self.word_range.len()
    }
}

/// Splits text into overlapping word windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> ChunkingResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Produces the ordered chunks for `text`. Always returns at least one chunk.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let words = split_words(text);
        self.window_ranges(words.len())
            .into_iter()
            .enumerate()
            .map(|(index, range)| Chunk {
                index,
                text: words[range.clone()].join(" "),
                word_range: range,
            })
            .collect()
    }

    fn window_ranges(&self, total: usize) -> Vec<Range<usize>> {
        let window = self.config.window_words;
        if total <= window {
            return vec![0..total];
        }

        let step = self.config.step();
        let mut ranges = Vec::with_capacity(total / step + 1);
        let mut start = 0;
        loop {
            let end = (start + window).min(total);
            ranges.push(start..end);
            if end >= total {
                break;
            }
            start += step;
        }

        if ranges.len() > 1
            && ranges
                .last()
                .is_some_and(|tail| tail.len() < self.config.min_tail_words)
        {
            if let Some(tail) = ranges.pop() {
                if let Some(previous) = ranges.last_mut() {
                    previous.end = tail.end;
                }
            }
        }

        ranges
    }
}

/// Chunks `text` with the default 150/25/50 window parameters.
pub fn chunk_text(text: &str) -> Vec<Chunk> {
    Chunker::default().chunk(text)
}

/// Splits on whitespace runs. Blank input yields a single empty token.
pub fn split_words(text: &str) -> Vec<&str> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        vec![text.trim()]
    } else {
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(count: usize) -> String {
        (0..count)
            .map(|i| format!("w{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn thousand_words_yield_eight_chunks() {
        let chunks = chunk_text(&words(1000));
        assert_eq!(chunks.len(), 8);
        assert_eq!(chunks[0].word_range, 0..150);
        assert_eq!(chunks[1].word_range, 125..275);
        assert_eq!(chunks[7].word_range, 875..1000);
        assert_eq!(chunks[7].word_count(), 125);
    }

    #[test]
    fn short_tail_is_merged_into_previous_window() {
        let chunks = chunk_text(&words(170));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].word_range, 0..170);
        assert_eq!(chunks[0].text.split(' ').count(), 170);
    }

    #[test]
    fn tail_at_minimum_is_kept() {
        let chunks = chunk_text(&words(180));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].word_range, 125..180);

        let chunks = chunk_text(&words(175));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].word_count(), 50);
    }

    #[test]
    fn exact_window_is_single_chunk() {
        let chunks = chunk_text(&words(150));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn whitespace_is_normalized() {
        let chunks = chunk_text("  alpha\t\tbeta\n\ngamma  ");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "alpha beta gamma");
        assert_eq!(chunks[0].word_range, 0..3);
    }

    #[test]
    fn blank_input_yields_single_empty_chunk() {
        for input in ["", "   ", "\n\t"] {
            let chunks = chunk_text(input);
            assert_eq!(chunks.len(), 1);
            assert_eq!(chunks[0].text, "");
            assert_eq!(chunks[0].word_range, 0..1);
        }
    }

    #[test]
    fn overlap_must_be_smaller_than_window() {
        let config = ChunkingConfig {
            window_words: 10,
            overlap_words: 10,
            min_tail_words: 0,
        };
        assert!(matches!(
            Chunker::new(config),
            Err(ChunkingError::InvalidConfig(_))
        ));
        assert!(Chunker::new(ChunkingConfig {
            window_words: 0,
            ..ChunkingConfig::default()
        })
        .is_err());
    }

    #[test]
    fn custom_windows() {
        let chunker = Chunker::new(ChunkingConfig {
            window_words: 4,
            overlap_words: 1,
            min_tail_words: 3,
        })
        .unwrap();
        let ranges = |count: usize| -> Vec<Range<usize>> {
            chunker
                .chunk(&words(count))
                .into_iter()
                .map(|c| c.word_range)
                .collect()
        };

        assert_eq!(ranges(10), vec![0..4, 3..7, 6..10]);
        // 6..8 is only two words, folded into 3..7
        assert_eq!(ranges(8), vec![0..4, 3..8]);
        assert_eq!(ranges(9), vec![0..4, 3..7, 6..9]);
    }
}
