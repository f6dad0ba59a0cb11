//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::document::Embedding;
use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends (OpenAI, local models,
/// deterministic stubs) behind a unified async interface. The default
/// [`embed_batch`](EmbeddingProvider::embed_batch) implementation calls
/// [`embed`](EmbeddingProvider::embed) once per input, in order; backends
/// that support native batching should override it.
///
/// The same provider must embed both the document chunks and the question.
/// Vectors from different providers can have matching dimensionality and
/// still be meaningless to compare, which the index cannot detect.
///
/// # Example
///
/// ```rust,ignore
/// use askdoc_rag::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let embedding = provider.embed("hello world").await?;
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// Must return exactly one vector per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider,
    /// if known ahead of the first call.
    fn dimensions(&self) -> Option<usize> {
        None
    }

    /// A short name used in logs and error messages.
    fn name(&self) -> &str {
        "embedding"
    }
}
