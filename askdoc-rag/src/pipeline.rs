//! Question-answering pipeline orchestrator.
//!
//! The [`RagPipeline`] runs one document and one question through
//! chunk → embed → index → retrieve → synthesize, strictly in that order.
//! The index lives only for the duration of the call; nothing is cached
//! between requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use askdoc_rag::{RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::builder().chunk_size(500).top_k(3).build()?)
//!     .embedding_provider(Arc::new(my_embedder))
//!     .generation_provider(Arc::new(my_llm))
//!     .build()?;
//!
//! let answer = pipeline.answer_question(&document, "What color is grass?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chunking::{Chunker, FixedSizeChunker};
use crate::config::RagConfig;
use crate::document::RagAnswer;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;
use crate::index::VectorIndex;
use crate::retriever::Retriever;
use crate::synthesizer::{AnswerSynthesizer, PromptTemplate};

/// The pipeline orchestrator.
///
/// Construct one via [`RagPipeline::builder()`]. A pipeline holds only
/// immutable configuration and capability handles, so it can be shared
/// across concurrent requests.
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    generation_provider: Arc<dyn GenerationProvider>,
    chunker: Arc<dyn Chunker>,
    synthesizer: AnswerSynthesizer,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the generation provider.
    pub fn generation_provider(&self) -> &Arc<dyn GenerationProvider> {
        &self.generation_provider
    }

    /// The retrieval policy derived from the configuration.
    pub fn retriever(&self) -> Retriever {
        Retriever::new(self.config.top_k)
            .with_similarity_threshold(self.config.similarity_threshold)
    }

    /// Chunk `document` and build a vector index over it.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyDocument`] without calling the embedding
    /// provider if `document` is empty or whitespace-only, and propagates
    /// any embedding or dimension error from the build.
    pub async fn index_document(&self, document: &str) -> Result<VectorIndex> {
        if document.trim().is_empty() {
            warn!(document_len = document.len(), "refusing to index an empty document");
            return Err(RagError::EmptyDocument);
        }

        let chunks = self.chunker.chunk(document);
        info!(document_len = document.len(), chunk_count = chunks.len(), "chunked document");

        VectorIndex::build_with_concurrency(
            chunks,
            self.embedding_provider.as_ref(),
            self.config.embed_concurrency,
        )
        .await
        .inspect_err(|e| error!(error = %e, "index build failed"))
    }

    /// Answer `question` from an index built by [`index_document`](Self::index_document).
    ///
    /// The index is only read, so several questions may run against it at once.
    ///
    /// # Errors
    ///
    /// Propagates embedding, dimension, and generation errors unmodified.
    pub async fn answer_with_index(
        &self,
        index: &VectorIndex,
        question: &str,
    ) -> Result<RagAnswer> {
        let retrieval = self
            .retriever()
            .retrieve(index, question, self.embedding_provider.as_ref())
            .await
            .inspect_err(|e| error!(error = %e, "retrieval failed"))?;

        if retrieval.is_empty() {
            info!("no relevant chunks found, answering with empty context");
        }

        let answer = self
            .synthesizer
            .synthesize(question, &retrieval.chunks, self.generation_provider.as_ref())
            .await?;

        info!(source_count = retrieval.len(), answer_len = answer.len(), "answered question");
        Ok(RagAnswer { answer, sources: retrieval.chunks })
    }

    /// Index `document` and answer `question`, returning the answer together
    /// with the chunks it was grounded on.
    ///
    /// # Errors
    ///
    /// See [`index_document`](Self::index_document) and
    /// [`answer_with_index`](Self::answer_with_index).
    pub async fn ask(&self, document: &str, question: &str) -> Result<RagAnswer> {
        let index = self.index_document(document).await?;
        self.answer_with_index(&index, question).await
    }

    /// Index `document` and answer `question`, returning the generator's
    /// output verbatim.
    ///
    /// # Errors
    ///
    /// See [`ask`](Self::ask).
    pub async fn answer_question(&self, document: &str, question: &str) -> Result<String> {
        self.ask(document, question).await.map(|a| a.answer)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The embedding and generation providers are required. Without an explicit
/// chunker a [`FixedSizeChunker`] is built from the configuration's
/// `chunk_size` and `chunk_overlap`.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = RagPipeline::builder()
///     .config(RagConfig::default())
///     .embedding_provider(Arc::new(embedder))
///     .generation_provider(Arc::new(llm))
///     .chunker(Arc::new(ParagraphChunker::new(1000, 0)?))  // optional
///     .build()?;
/// ```
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    generation_provider: Option<Arc<dyn GenerationProvider>>,
    chunker: Option<Arc<dyn Chunker>>,
    prompt_template: Option<PromptTemplate>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration. Defaults to [`RagConfig::default()`].
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the text-generation provider.
    pub fn generation_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.generation_provider = Some(provider);
        self
    }

    /// Replace the default fixed-size chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Replace the default prompt template.
    pub fn prompt_template(mut self, template: PromptTemplate) -> Self {
        self.prompt_template = Some(template);
        self
    }

    /// Build the [`RagPipeline`], validating the configuration and that all
    /// required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the configuration is invalid or a
    /// required provider is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let generation_provider = self
            .generation_provider
            .ok_or_else(|| RagError::ConfigError("generation_provider is required".to_string()))?;
        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        Ok(RagPipeline {
            config,
            embedding_provider,
            generation_provider,
            chunker,
            synthesizer: AnswerSynthesizer::new(self.prompt_template.unwrap_or_default()),
        })
    }
}

/// Answer `question` about `document` in one call.
///
/// Validates `config`, then chunks, embeds, indexes, retrieves, and
/// synthesizes. Nothing outlives the call.
///
/// # Errors
///
/// - [`RagError::ConfigError`] for invalid parameters, before any provider call
/// - [`RagError::EmptyDocument`] for an empty or whitespace-only document,
///   before any provider call
/// - embedding, dimension, and generation errors, propagated unmodified
pub async fn answer_question(
    document: &str,
    question: &str,
    config: &RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
) -> Result<String> {
    RagPipeline::builder()
        .config(config.clone())
        .embedding_provider(embedder)
        .generation_provider(generator)
        .build()?
        .answer_question(document, question)
        .await
}
