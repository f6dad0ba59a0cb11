//! # Ask the Doc (offline)
//!
//! Runs the whole pipeline on a built-in document with a deterministic
//! `HashEmbeddingProvider` and an `EchoGenerator` that returns the prompt it
//! was given, so it runs with **zero API keys** and shows exactly what the
//! language model would see.
//!
//! Run: `cargo run -p askdoc-demos --example ask_doc_offline`

use std::sync::Arc;

use askdoc_demos::init_tracing;
use askdoc_rag::{EmbeddingProvider, GenerationProvider, RagConfig, RagPipeline};

// ---------------------------------------------------------------------------
// HashEmbeddingProvider — hashed bag-of-words vectors for demos
// ---------------------------------------------------------------------------

struct HashEmbeddingProvider {
    dimensions: usize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> askdoc_rag::Result<Vec<f32>> {
        let mut emb = vec![0.0f32; self.dimensions];
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let hash = word
                .to_lowercase()
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            emb[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        Ok(emb)
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }

    fn name(&self) -> &str {
        "hash"
    }
}

struct EchoGenerator;

#[async_trait::async_trait]
impl GenerationProvider for EchoGenerator {
    async fn generate(&self, prompt: &str) -> askdoc_rag::Result<String> {
        Ok(prompt.to_string())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

const DOCUMENT: &str = "\
Rust is a systems programming language focused on safety, speed, and concurrency. \
It achieves memory safety without a garbage collector through its ownership system.

Retrieval-augmented generation combines a retrieval system with a language model. \
Documents are chunked, embedded, and indexed. At query time the most relevant chunks \
are retrieved and handed to the model as context.

Cosine similarity compares two vectors by the angle between them and ignores their length.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Small chunks so the short document spans several of them.
    let config = RagConfig::builder().chunk_size(120).chunk_overlap(20).top_k(2).build()?;

    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(HashEmbeddingProvider { dimensions: 128 }))
        .generation_provider(Arc::new(EchoGenerator))
        .build()?;

    let index = pipeline.index_document(DOCUMENT).await?;
    println!("Indexed {} chunk(s)\n", index.len());

    let questions = ["How does Rust achieve memory safety?", "What does cosine similarity ignore?"];
    for question in questions {
        let answer = pipeline.answer_with_index(&index, question).await?;
        println!("=== {question}");
        for source in &answer.sources {
            println!("  source #{} @{}: {:?}", source.index, source.start, source.text);
        }
        println!("\n{}\n", answer.answer);
    }

    Ok(())
}
