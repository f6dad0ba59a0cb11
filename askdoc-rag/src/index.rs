//! In-memory vector index using cosine similarity.
//!
//! A [`VectorIndex`] is built once per document from its chunks and is
//! read-only afterwards. It holds no state beyond that single build: there is
//! no insertion, deletion, or persistence. Because nothing is mutated after
//! construction, a built index can be shared (for example behind an `Arc`)
//! and queried from several tasks at once.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::document::{Chunk, Embedding, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

#[derive(Debug, Clone)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Embedding,
    norm: f32,
}

/// An ordered collection of chunks and their embeddings.
///
/// Every stored embedding has the same dimensionality. Entries keep the order
/// of the chunks passed to [`build`](VectorIndex::build), which is also the
/// tie-break order for equal scores.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorIndex {
    /// Embed every chunk, in input order, and build an index over them.
    ///
    /// Uses the provider's [`embed_batch`](EmbeddingProvider::embed_batch),
    /// which by default calls `embed` once per chunk.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if any embedding call fails,
    /// whatever error the provider reported. The build is aborted and no index is
    /// produced. Returns [`RagError::DimensionMismatch`] if the vectors do not
    /// all share one dimensionality.
    pub async fn build(chunks: Vec<Chunk>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        Self::build_with_concurrency(chunks, embedder, 1).await
    }

    /// Like [`build`](VectorIndex::build), but keeps up to `concurrency`
    /// `embed` calls in flight. Results are reassembled in chunk order, so
    /// the built index is identical to a sequential build.
    pub async fn build_with_concurrency(
        chunks: Vec<Chunk>,
        embedder: &dyn EmbeddingProvider,
        concurrency: usize,
    ) -> Result<Self> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        debug!(
            provider = embedder.name(),
            chunk_count = texts.len(),
            concurrency,
            "embedding chunks"
        );

        let embedded = if concurrency <= 1 {
            embedder.embed_batch(&texts).await
        } else {
            stream::iter(texts.iter().copied())
                .map(|text| embedder.embed(text))
                .buffered(concurrency)
                .try_collect::<Vec<Embedding>>()
                .await
        };
        let embeddings = embedded.map_err(|e| e.into_embedding(embedder.name()))?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::embedding(
                embedder.name(),
                format!("expected {} embeddings, got {}", chunks.len(), embeddings.len()),
            ));
        }

        let index = Self::from_embeddings(chunks, embeddings, embedder.dimensions())
            .map_err(|e| match e {
                RagError::EmbeddingError { message, .. } => {
                    RagError::embedding(embedder.name(), message)
                }
                other => other,
            })?;

        info!(chunk_count = index.len(), dimensions = index.dimensions, "built vector index");
        Ok(index)
    }

    /// Build an index from chunks and precomputed embeddings, pairwise.
    ///
    /// `expected_dimensions` pins the dimensionality; when `None` the first
    /// embedding decides it.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if the counts differ or an
    /// embedding is empty, and [`RagError::DimensionMismatch`] if any
    /// embedding has a different dimensionality.
    pub fn from_embeddings(
        chunks: Vec<Chunk>,
        embeddings: Vec<Embedding>,
        expected_dimensions: Option<usize>,
    ) -> Result<Self> {
        if embeddings.len() != chunks.len() {
            return Err(RagError::embedding(
                "index",
                format!("expected {} embeddings, got {}", chunks.len(), embeddings.len()),
            ));
        }

        let dimensions = match expected_dimensions.or_else(|| embeddings.first().map(Vec::len)) {
            Some(0) => {
                return Err(RagError::embedding("index", "embeddings must not be empty"));
            }
            Some(d) => d,
            None => 0,
        };

        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            if embedding.len() != dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: dimensions,
                    actual: embedding.len(),
                });
            }
            let norm = l2_norm(&embedding);
            entries.push(IndexEntry { chunk, embedding, norm });
        }

        Ok(Self { entries, dimensions })
    }

    /// Return the `k` chunks most similar to `vector`, highest score first.
    ///
    /// Scores are cosine similarities. Equal scores keep chunk order. `k` is
    /// clamped to the index size; an empty index returns no results.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if `vector` does not have the
    /// index's dimensionality.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if vector.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }

        let query_norm = l2_norm(vector);
        let mut scored: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| {
                let score = if entry.norm == 0.0 || query_norm == 0.0 {
                    0.0
                } else {
                    let dot: f32 =
                        entry.embedding.iter().zip(vector.iter()).map(|(x, y)| x * y).sum();
                    dot / (entry.norm * query_norm)
                };
                SearchResult { chunk: entry.chunk.clone(), score }
            })
            .collect();

        // sort_by is stable, so ties keep insertion order
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality shared by every stored embedding (0 for an empty index).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The indexed chunks, in build order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|e| &e.chunk)
    }
}
