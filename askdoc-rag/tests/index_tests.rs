//! Vector index build and query tests.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use askdoc_rag::{Chunk, RagError, VectorIndex, retrieve, split};
use common::{BagOfWordsEmbedder, DIMENSIONS};
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-3 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

fn chunks_for(n: usize) -> Vec<Chunk> {
    (0..n).map(|index| Chunk { index, start: index, text: format!("chunk {index}") }).collect()
}

/// **Property: query results are bounded, ordered, and drawn from the index**
/// *For any* index of N chunks, `query(v, k)` SHALL return `min(k, N)`
/// distinct indexed chunks ordered by non-increasing score.
mod prop_query_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_k(
            embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            k in 0usize..25,
        ) {
            let n = embeddings.len();
            let index = VectorIndex::from_embeddings(chunks_for(n), embeddings, None).unwrap();
            let results = index.query(&query, k).unwrap();

            prop_assert_eq!(results.len(), k.min(n));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }

            let mut seen = HashSet::new();
            for result in &results {
                prop_assert!(result.chunk.index < n);
                prop_assert!(seen.insert(result.chunk.index), "duplicate chunk {}", result.chunk.index);
                prop_assert_eq!(&result.chunk, &chunks_for(n)[result.chunk.index]);
            }
        }

        #[test]
        fn stored_vector_finds_itself_first(
            embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
            pick in any::<prop::sample::Index>(),
        ) {
            let n = embeddings.len();
            let target = pick.index(n);
            let query = embeddings[target].clone();
            let index = VectorIndex::from_embeddings(chunks_for(n), embeddings, None).unwrap();

            let results = index.query(&query, 1).unwrap();
            prop_assert_eq!(results[0].chunk.index, target);
            prop_assert!((results[0].score - 1.0).abs() < 1e-5, "self score {}", results[0].score);
        }
    }
}

#[tokio::test]
async fn build_embeds_each_chunk_once_in_order() {
    let embedder = BagOfWordsEmbedder::new();
    let chunks = split("alpha beta gamma delta epsilon", 6, 0).unwrap();
    let n = chunks.len();

    let index = VectorIndex::build(chunks.clone(), &embedder).await.unwrap();

    assert_eq!(embedder.calls(), n);
    assert_eq!(index.len(), n);
    assert_eq!(index.dimensions(), DIMENSIONS);
    assert_eq!(index.chunks().cloned().collect::<Vec<_>>(), chunks);
}

#[tokio::test]
async fn failing_embed_aborts_the_build() {
    let embedder = BagOfWordsEmbedder::failing_on(3);
    let chunks = split("one two three four five six seven", 5, 0).unwrap();
    assert!(chunks.len() > 3);

    let result = VectorIndex::build(chunks, &embedder).await;

    assert!(matches!(result, Err(RagError::EmbeddingError { .. })));
    assert_eq!(embedder.calls(), 3, "build must stop at the first failure");
}

#[tokio::test]
async fn concurrent_build_matches_sequential_build() {
    let document = "Rust has ownership. Borrowing is checked at compile time. \
                    Lifetimes name regions. Traits describe shared behavior.";
    let chunks = split(document, 16, 4).unwrap();

    let sequential = VectorIndex::build(chunks.clone(), &BagOfWordsEmbedder::new()).await.unwrap();
    let concurrent =
        VectorIndex::build_with_concurrency(chunks, &BagOfWordsEmbedder::new(), 4).await.unwrap();

    let query = BagOfWordsEmbedder::vector("compile time borrowing");
    assert_eq!(
        sequential.query(&query, 5).unwrap(),
        concurrent.query(&query, 5).unwrap()
    );
}

#[tokio::test]
async fn concurrent_build_fails_on_any_error() {
    let chunks = split("a b c d e f g h i j", 2, 0).unwrap();
    let result =
        VectorIndex::build_with_concurrency(chunks, &BagOfWordsEmbedder::failing_on(2), 3).await;
    assert!(matches!(result, Err(RagError::EmbeddingError { .. })));
}

#[tokio::test]
async fn index_is_queryable_from_many_tasks() {
    let document = "The sky is blue. Grass is green. Water is wet.";
    let embedder = Arc::new(BagOfWordsEmbedder::new());
    let index = Arc::new(
        VectorIndex::build(split(document, 20, 5).unwrap(), embedder.as_ref()).await.unwrap(),
    );

    let handles: Vec<_> = ["sky", "grass", "water"]
        .into_iter()
        .map(|question| {
            let index = Arc::clone(&index);
            let embedder = Arc::clone(&embedder);
            tokio::spawn(async move { retrieve(&index, question, embedder.as_ref(), 1).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.len(), 1);
    }
}

#[tokio::test]
async fn retrieval_ranks_the_matching_chunk_first() {
    let document = "The sky is blue. Grass is green. Water is wet.";
    let embedder = BagOfWordsEmbedder::new();
    let index = VectorIndex::build(split(document, 20, 5).unwrap(), &embedder).await.unwrap();

    let result = retrieve(&index, "What color is grass?", &embedder, 1).await.unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.chunks[0].text.contains("Grass is green"));
}
