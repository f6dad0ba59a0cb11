//! Retrieval-augmented question answering over a single text document.
//!
//! This crate provides:
//! - Fixed-size and paragraph-aware document chunking
//! - An in-memory cosine-similarity [`VectorIndex`], built once per document
//! - Top-k retrieval and grounded prompt assembly
//! - [`RagPipeline`], which sequences chunk → embed → index → retrieve → answer
//!
//! Embedding and text generation are supplied by the caller through the
//! [`EmbeddingProvider`] and [`GenerationProvider`] traits. OpenAI-backed
//! implementations live in the [`openai`] module behind the `openai` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use askdoc_rag::{answer_question, RagConfig};
//!
//! let answer = answer_question(
//!     &document,
//!     "What color is grass?",
//!     &RagConfig::default(),
//!     Arc::new(embedder),
//!     Arc::new(llm),
//! )
//! .await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod pipeline;
pub mod retriever;
pub mod synthesizer;

#[cfg(feature = "openai")]
pub mod openai;

pub use chunking::{Chunker, FixedSizeChunker, ParagraphChunker, split};
pub use config::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_TOP_K, RagConfig, RagConfigBuilder,
};
pub use document::{Chunk, Embedding, RagAnswer, RetrievalResult, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{ErrorKind, RagError, Result};
pub use generation::GenerationProvider;
pub use index::{VectorIndex, cosine_similarity};
pub use pipeline::{RagPipeline, RagPipelineBuilder, answer_question};
pub use retriever::{Retriever, retrieve};
pub use synthesizer::{AnswerSynthesizer, PromptTemplate, synthesize};
