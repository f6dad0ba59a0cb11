//! Deterministic stub capabilities shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use askdoc_rag::{Embedding, EmbeddingProvider, GenerationProvider, RagError};
use async_trait::async_trait;

pub const DIMENSIONS: usize = 64;

fn fnv1a(token: &str) -> u64 {
    token
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, b| (hash ^ b as u64).wrapping_mul(0x100_0000_01b3))
}

/// Hashed bag-of-words embedder. Texts sharing words score higher.
///
/// Counts every `embed` call and can be told to fail on the n-th one.
pub struct BagOfWordsEmbedder {
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
}

impl BagOfWordsEmbedder {
    pub fn new() -> Self {
        Self { calls: AtomicUsize::new(0), fail_on_call: None }
    }

    pub fn failing_on(call: usize) -> Self {
        Self { calls: AtomicUsize::new(0), fail_on_call: Some(call) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector(text: &str) -> Embedding {
        let mut v = vec![0.0f32; DIMENSIONS];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let bucket = (fnv1a(&token.to_lowercase()) % DIMENSIONS as u64) as usize;
            v[bucket] += 1.0;
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for BagOfWordsEmbedder {
    async fn embed(&self, text: &str) -> askdoc_rag::Result<Embedding> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(RagError::embedding("stub", format!("call {call} failed")));
        }
        Ok(Self::vector(text))
    }

    fn dimensions(&self) -> Option<usize> {
        Some(DIMENSIONS)
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Returns a vector of the wrong size for the question (every call after `after`).
pub struct ShrinkingEmbedder {
    calls: AtomicUsize,
    after: usize,
}

impl ShrinkingEmbedder {
    pub fn after(after: usize) -> Self {
        Self { calls: AtomicUsize::new(0), after }
    }
}

#[async_trait]
impl EmbeddingProvider for ShrinkingEmbedder {
    async fn embed(&self, text: &str) -> askdoc_rag::Result<Embedding> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut v = BagOfWordsEmbedder::vector(text);
        if call > self.after {
            v.truncate(DIMENSIONS / 2);
        }
        Ok(v)
    }
}

/// Echoes the prompt back as the answer.
pub struct EchoGenerator {
    calls: AtomicUsize,
}

impl EchoGenerator {
    pub fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for EchoGenerator {
    async fn generate(&self, prompt: &str) -> askdoc_rag::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(prompt.to_string())
    }
}

/// Always fails, as a provider with a revoked key would.
pub struct FailingGenerator;

#[async_trait]
impl GenerationProvider for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> askdoc_rag::Result<String> {
        Err(RagError::generation("stub", "quota exceeded"))
    }
}

/// Reports its failures with the wrong error variant.
pub struct MisreportingEmbedder;

#[async_trait]
impl EmbeddingProvider for MisreportingEmbedder {
    async fn embed(&self, _text: &str) -> askdoc_rag::Result<Embedding> {
        Err(RagError::ConfigError("model not configured".into()))
    }

    fn name(&self) -> &str {
        "misreporting"
    }
}

/// Like [`MisreportingEmbedder`], for generation.
pub struct MisreportingGenerator;

#[async_trait]
impl GenerationProvider for MisreportingGenerator {
    async fn generate(&self, _prompt: &str) -> askdoc_rag::Result<String> {
        Err(RagError::EmptyDocument)
    }
}

/// Embeds chunks normally but returns an empty vector for every call after `after`.
pub struct HollowEmbedder {
    calls: AtomicUsize,
    after: usize,
}

impl HollowEmbedder {
    pub fn after(after: usize) -> Self {
        Self { calls: AtomicUsize::new(0), after }
    }
}

#[async_trait]
impl EmbeddingProvider for HollowEmbedder {
    async fn embed(&self, text: &str) -> askdoc_rag::Result<Embedding> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call > self.after {
            return Ok(Vec::new());
        }
        Ok(BagOfWordsEmbedder::vector(text))
    }
}
