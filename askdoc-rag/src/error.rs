//! Error types for the `askdoc-rag` crate.

use thiserror::Error;

/// Errors that can occur while answering a question about a document.
///
/// Every variant reaches the caller of [`answer_question`](crate::answer_question)
/// unmodified. The pipeline never retries and never degrades silently.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid chunking or retrieval parameters. Raised before any external call.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The document is empty or contains only whitespace.
    #[error("Document is empty: nothing to index")]
    EmptyDocument,

    /// The embedding provider failed while building the index or embedding the question.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Embeddings of inconsistent dimensionality reached the index.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimensionality of the index.
        expected: usize,
        /// The dimensionality of the offending vector.
        actual: usize,
    },

    /// The text-generation provider failed during answer synthesis.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

/// Coarse classification of a [`RagError`].
///
/// Presentation layers match on this to pick a user-facing message without
/// depending on the error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    EmptyDocument,
    Embedding,
    DimensionMismatch,
    Generation,
}

impl RagError {
    /// Build an [`RagError::EmbeddingError`].
    pub fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingError { provider: provider.into(), message: message.into() }
    }

    /// Build a [`RagError::GenerationError`].
    pub fn generation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GenerationError { provider: provider.into(), message: message.into() }
    }

    /// Return the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigError(_) => ErrorKind::Configuration,
            Self::EmptyDocument => ErrorKind::EmptyDocument,
            Self::EmbeddingError { .. } => ErrorKind::Embedding,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::GenerationError { .. } => ErrorKind::Generation,
        }
    }

    /// Classify an error returned by an embedding provider.
    ///
    /// Whatever variant the provider chose, a failure inside `embed` is an
    /// [`RagError::EmbeddingError`]. Embedding errors pass through as-is.
    pub(crate) fn into_embedding(self, provider: &str) -> Self {
        match self {
            err @ Self::EmbeddingError { .. } => err,
            other => Self::embedding(provider, other.to_string()),
        }
    }

    /// Classify an error returned by a generation provider.
    ///
    /// Generation errors pass through as-is; anything else is wrapped.
    pub(crate) fn into_generation(self, provider: &str) -> Self {
        match self {
            err @ Self::GenerationError { .. } => err,
            other => Self::generation(provider, other.to_string()),
        }
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
