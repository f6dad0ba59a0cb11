//! Top-k retrieval over a [`VectorIndex`].

use tracing::debug;

use crate::config::DEFAULT_TOP_K;
use crate::document::{RetrievalResult, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Retrieval policy: how many chunks to return and an optional score floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Retriever {
    top_k: usize,
    similarity_threshold: Option<f32>,
}

impl Default for Retriever {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl Retriever {
    /// Create a retriever returning at most `top_k` chunks.
    pub fn new(top_k: usize) -> Self {
        Self { top_k, similarity_threshold: None }
    }

    /// Drop results scoring below `threshold`.
    pub fn with_similarity_threshold(mut self, threshold: Option<f32>) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Embed `question` and return the ranked results with their scores.
    ///
    /// `embedder` must be the provider the index was built with.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if the provider fails or returns
    /// an empty vector, and [`RagError::DimensionMismatch`] if the question
    /// vector does not match the index.
    pub async fn retrieve_scored(
        &self,
        index: &VectorIndex,
        question: &str,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Vec<SearchResult>> {
        let query_embedding =
            embedder.embed(question).await.map_err(|e| e.into_embedding(embedder.name()))?;
        if query_embedding.is_empty() {
            return Err(RagError::embedding(embedder.name(), "question embedding is empty"));
        }
        let mut results = index.query(&query_embedding, self.top_k)?;

        if let Some(threshold) = self.similarity_threshold {
            results.retain(|r| r.score >= threshold);
        }

        debug!(
            result_count = results.len(),
            top_score = results.first().map(|r| r.score),
            "retrieved chunks"
        );
        Ok(results)
    }

    /// Embed `question` and return the ranked chunks, scores discarded.
    ///
    /// # Errors
    ///
    /// See [`retrieve_scored`](Retriever::retrieve_scored).
    pub async fn retrieve(
        &self,
        index: &VectorIndex,
        question: &str,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<RetrievalResult> {
        self.retrieve_scored(index, question, embedder).await.map(RetrievalResult::from)
    }
}

/// Retrieve the `k` chunks most similar to `question`.
///
/// # Errors
///
/// See [`Retriever::retrieve_scored`].
pub async fn retrieve(
    index: &VectorIndex,
    question: &str,
    embedder: &dyn EmbeddingProvider,
    k: usize,
) -> Result<RetrievalResult> {
    Retriever::new(k).retrieve(index, question, embedder).await
}
