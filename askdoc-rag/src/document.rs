//! Data types for chunks, search results, and answers.

use serde::{Deserialize, Serialize};

/// A fixed-length vector representing the content of a chunk or question.
pub type Embedding = Vec<f32>;

/// A contiguous segment of a document.
///
/// `start` is the byte offset of `text` in the source document, so
/// `&document[chunk.start..chunk.end()] == chunk.text` always holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in the chunker's output.
    pub index: usize,
    /// Byte offset of the chunk in the source document.
    pub start: usize,
    /// The text content of the chunk.
    pub text: String,
}

impl Chunk {
    /// Byte offset one past the end of the chunk in the source document.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Number of characters in the chunk.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A retrieved [`Chunk`] paired with its cosine similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// Chunks ranked by descending similarity to a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrievalResult {
    /// The ranked chunks, most relevant first.
    pub chunks: Vec<Chunk>,
}

impl RetrievalResult {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }
}

impl From<Vec<SearchResult>> for RetrievalResult {
    fn from(results: Vec<SearchResult>) -> Self {
        Self { chunks: results.into_iter().map(|r| r.chunk).collect() }
    }
}

/// A generated answer together with the chunks it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagAnswer {
    /// The generation provider's output, unmodified.
    pub answer: String,
    /// The context chunks handed to the generator, most relevant first.
    pub sources: Vec<Chunk>,
}
