//! Text-generation provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that completes a prompt with generated text.
///
/// The pipeline calls [`generate`](GenerationProvider::generate) exactly
/// once per question and returns its output unmodified. Failures should be
/// reported as [`RagError::GenerationError`](crate::RagError::GenerationError).
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// A short name used in logs and error messages.
    fn name(&self) -> &str {
        "generation"
    }
}
