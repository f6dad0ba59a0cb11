//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] — splits by character count with configurable overlap
//! - [`ParagraphChunker`] — packs whole paragraphs into chunks, falling back to
//!   fixed-size splitting for paragraphs that do not fit
//!
//! Sizes are counted in characters, never bytes, so chunk boundaries always
//! fall on UTF-8 character boundaries. Every character of the document is
//! covered by at least one chunk.

use crate::document::Chunk;
use crate::error::{RagError, Result};

/// Separator between paragraphs.
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// A strategy for splitting a document into chunks.
///
/// Implementations return chunks in document order with sequential indices.
/// An empty document yields no chunks.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    fn chunk(&self, document: &str) -> Vec<Chunk>;
}

fn validate_window(chunk_size: usize, chunk_overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
    }
    if chunk_overlap >= chunk_size {
        return Err(RagError::ConfigError(format!(
            "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}

/// Split `document` into windows of `chunk_size` characters, advancing by
/// `chunk_size - chunk_overlap` characters each step.
///
/// The last chunk holds the remaining tail and may be shorter. A document no
/// longer than `chunk_size` yields exactly one chunk equal to the whole text.
///
/// # Errors
///
/// Returns [`RagError::ConfigError`] if `chunk_size == 0` or
/// `chunk_overlap >= chunk_size`.
pub fn split(document: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<Chunk>> {
    validate_window(chunk_size, chunk_overlap)?;
    Ok(to_chunks(document, window_ranges(document, 0, chunk_size, chunk_overlap)))
}

/// Byte ranges of the fixed-size windows over `text`, shifted by `offset`.
///
/// Callers guarantee `chunk_overlap < chunk_size`.
fn window_ranges(
    text: &str,
    offset: usize,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<(usize, usize)> {
    let boundaries: Vec<usize> =
        text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
    let char_count = boundaries.len() - 1;
    if char_count == 0 {
        return Vec::new();
    }

    let step = chunk_size - chunk_overlap;
    let mut ranges = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + chunk_size).min(char_count);
        ranges.push((offset + boundaries[start], offset + boundaries[end]));
        if end == char_count {
            break;
        }
        start += step;
    }
    ranges
}

fn to_chunks(document: &str, ranges: Vec<(usize, usize)>) -> Vec<Chunk> {
    ranges
        .into_iter()
        .enumerate()
        .map(|(index, (start, end))| Chunk { index, start, text: document[start..end].to_string() })
        .collect()
}

/// Splits text into fixed-size chunks by character count with configurable overlap.
///
/// # Example
///
/// ```rust
/// use askdoc_rag::{Chunker, FixedSizeChunker};
///
/// let chunker = FixedSizeChunker::new(20, 5)?;
/// let chunks = chunker.chunk("The sky is blue. Grass is green. Water is wet.");
/// assert_eq!(chunks[1].start, 15);
/// # Ok::<(), askdoc_rag::RagError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — number of overlapping characters between consecutive chunks
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size == 0` or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate_window(chunk_size, chunk_overlap)?;
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &str) -> Vec<Chunk> {
        to_chunks(document, window_ranges(document, 0, self.chunk_size, self.chunk_overlap))
    }
}

/// Packs paragraphs (separated by a blank line) into chunks of at most
/// `chunk_size` characters.
///
/// Each separator stays attached to the paragraph before it, so packed chunks
/// tile the document without gaps. A paragraph longer than `chunk_size` is
/// split on its own with the fixed-size rule, using `chunk_overlap`.
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl ParagraphChunker {
    /// Create a new `ParagraphChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size == 0` or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate_window(chunk_size, chunk_overlap)?;
        Ok(Self { chunk_size, chunk_overlap })
    }
}

/// Byte ranges of `text` split at `separator`, keeping the separator attached
/// to the preceding segment.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<(usize, usize)> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push((start, end));
        start = end;
    }

    if start < text.len() {
        result.push((start, text.len()));
    }

    result
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, document: &str) -> Vec<Chunk> {
        let mut ranges = Vec::new();
        // (start, end, chars) of the chunk being packed
        let mut current: Option<(usize, usize, usize)> = None;

        for (seg_start, seg_end) in split_keeping_separator(document, PARAGRAPH_SEPARATOR) {
            let segment = &document[seg_start..seg_end];
            let seg_chars = segment.chars().count();

            if seg_chars > self.chunk_size {
                if let Some((start, end, _)) = current.take() {
                    ranges.push((start, end));
                }
                ranges.extend(window_ranges(
                    segment,
                    seg_start,
                    self.chunk_size,
                    self.chunk_overlap,
                ));
                continue;
            }

            current = match current {
                None => Some((seg_start, seg_end, seg_chars)),
                Some((start, _, chars)) if chars + seg_chars <= self.chunk_size => {
                    Some((start, seg_end, chars + seg_chars))
                }
                Some((start, end, _)) => {
                    ranges.push((start, end));
                    Some((seg_start, seg_end, seg_chars))
                }
            };
        }

        if let Some((start, end, _)) = current {
            ranges.push((start, end));
        }

        to_chunks(document, ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_document_is_a_single_chunk() {
        let chunks = split("hello", 10, 2).unwrap();
        assert_eq!(chunks, vec![Chunk { index: 0, start: 0, text: "hello".into() }]);
    }

    #[test]
    fn document_of_exactly_chunk_size_is_a_single_chunk() {
        let chunks = split("abcdefghij", 10, 3).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn windows_advance_by_size_minus_overlap() {
        let chunks = split("abcdefghij", 4, 1).unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["abcd", "defg", "ghij"]);
        let starts: Vec<usize> = chunks.iter().map(|c| c.start).collect();
        assert_eq!(starts, [0, 3, 6]);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "héllo wörld ✓✓✓";
        let chunks = split(text, 4, 0).unwrap();
        for chunk in &chunks {
            assert_eq!(&text[chunk.start..chunk.end()], chunk.text);
            assert!(chunk.char_len() <= 4);
        }
        assert_eq!(chunks.iter().map(|c| c.text.as_str()).collect::<String>(), text);
    }

    #[test]
    fn invalid_window_is_a_config_error() {
        assert!(matches!(split("abc", 0, 0), Err(RagError::ConfigError(_))));
        assert!(matches!(split("abc", 3, 3), Err(RagError::ConfigError(_))));
        assert!(FixedSizeChunker::new(5, 7).is_err());
        assert!(ParagraphChunker::new(0, 0).is_err());
    }

    #[test]
    fn empty_document_has_no_chunks() {
        assert!(split("", 10, 0).unwrap().is_empty());
        assert!(ParagraphChunker::new(10, 0).unwrap().chunk("").is_empty());
    }

    #[test]
    fn paragraphs_are_packed_up_to_chunk_size() {
        let text = "one one\n\ntwo two\n\nthree three three three";
        let chunker = ParagraphChunker::new(20, 0).unwrap();
        let chunks = chunker.chunk(text);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["one one\n\ntwo two\n\n", "three three three th", "ree"]);
        assert_eq!(chunks.iter().map(|c| c.text.as_str()).collect::<String>(), text);
        assert_eq!(chunks[2].index, 2);
    }

    #[test]
    fn separator_stays_with_preceding_segment() {
        assert_eq!(split_keeping_separator("a\n\nb", "\n\n"), vec![(0, 3), (3, 4)]);
        assert_eq!(split_keeping_separator("a\n\n", "\n\n"), vec![(0, 3)]);
    }
}
