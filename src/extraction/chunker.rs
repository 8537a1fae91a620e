//! Overlapping character-window chunking for retrieval

use crate::error::{Result, ResumeScoutError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub content: String,
    /// Char offsets into the source text
    pub start_index: usize,
    pub end_index: usize,
    pub chunk_id: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size <= overlap {
            return Err(ResumeScoutError::Processing(
                "Chunk size must be greater than overlap".to_string(),
            ));
        }
        Ok(Self { chunk_size, overlap })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into windows of at most `chunk_size` chars.
    ///
    /// Windows prefer to end on a paragraph break, then a line break, then
    /// whitespace, as long as that keeps at least half the window. Consecutive
    /// windows share at most `overlap` chars.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let total_length = chars.len();
        let mut chunks = Vec::new();

        let mut start = 0;
        while start < total_length {
            let end = (start + self.chunk_size).min(total_length);
            let actual_end = if end < total_length {
                preferred_break(&chars, start + self.chunk_size / 2, end).unwrap_or(end)
            } else {
                end
            };

            let content: String = chars[start..actual_end].iter().collect();
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                chunks.push(TextChunk {
                    content: trimmed.to_string(),
                    start_index: start,
                    end_index: actual_end,
                    chunk_id: chunks.len(),
                });
            }

            if actual_end >= total_length {
                break;
            }

            // Step back by the overlap, then forward to a word start
            let mut next = actual_end.saturating_sub(self.overlap).max(start + 1);
            if let Some(offset) = chars[next..actual_end].iter().position(|c| c.is_whitespace()) {
                next += offset + 1;
            }
            start = next;
        }

        chunks
    }
}

/// Last break position in `[floor, end)`, trying separators from coarsest to finest.
fn preferred_break(chars: &[char], floor: usize, end: usize) -> Option<usize> {
    let paragraph = (floor.max(1)..end)
        .rev()
        .find(|&i| chars[i] == '\n' && chars[i - 1] == '\n');
    let line = || (floor..end).rev().find(|&i| chars[i] == '\n');
    let space = || (floor..end).rev().find(|&i| chars[i].is_whitespace());
    let sentence = || (floor..end).rev().find(|&i| matches!(chars[i], '.' | '!' | '?'));

    paragraph
        .or_else(line)
        .or_else(space)
        .or_else(sentence)
        .map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(TextChunker::new(100, 100).is_err());
        assert!(TextChunker::new(100, 150).is_err());
        assert!(TextChunker::new(100, 20).is_ok());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunker = TextChunker::new(1000, 200).unwrap();
        let chunks = chunker.split("Jane Doe\nSoftware Engineer");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Jane Doe\nSoftware Engineer");
        assert_eq!(chunks[0].chunk_id, 0);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        let chunker = TextChunker::new(1000, 200).unwrap();
        assert!(chunker.split("").is_empty());
        assert!(chunker.split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_windows_bounded_and_cover_text() {
        let text = "Led a team of engineers building data pipelines. ".repeat(80);
        let total = text.chars().count();
        let chunker = TextChunker::new(1000, 200).unwrap();
        let chunks = chunker.split(&text);

        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].start_index, 0);
        assert_eq!(chunks.last().unwrap().end_index, total);

        for chunk in &chunks {
            assert!(chunk.end_index - chunk.start_index <= 1000);
            assert!(chunk.content.chars().count() <= 1000);
        }
        for pair in chunks.windows(2) {
            // Contiguous or overlapping, never a gap, never more than the overlap
            assert!(pair[1].start_index <= pair[0].end_index);
            assert!(pair[0].end_index - pair[1].start_index <= 200);
            assert!(pair[1].start_index > pair[0].start_index);
        }
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let first = "a".repeat(700);
        let second = "b ".repeat(400);
        let text = format!("{}\n\n{}", first, second);
        let chunker = TextChunker::new(1000, 200).unwrap();
        let chunks = chunker.split(&text);

        assert_eq!(chunks[0].content, first);
        assert_eq!(chunks[0].end_index, 702);
    }

    #[test]
    fn test_unbroken_text_hard_splits() {
        let text = "x".repeat(2500);
        let chunker = TextChunker::new(1000, 200).unwrap();
        let chunks = chunker.split(&text);

        assert_eq!(chunks[0].end_index, 1000);
        assert_eq!(chunks[1].start_index, 800);
        assert_eq!(chunks.last().unwrap().end_index, 2500);
    }
}
