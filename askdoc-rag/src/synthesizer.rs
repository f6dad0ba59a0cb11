//! Grounded prompt assembly and answer generation.

use tracing::{debug, error};

use crate::document::Chunk;
use crate::error::Result;
use crate::generation::GenerationProvider;

/// Instruction placed between the context and the question.
pub const DEFAULT_INSTRUCTION: &str = "Use only the context above to answer the question below. \
If the context does not contain the answer, say that no relevant information was found \
instead of making one up.";

/// Separator between context chunks.
pub const DEFAULT_DELIMITER: &str = "\n\n";

/// The text surrounding the retrieved context in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Instruction telling the model to answer from the context only.
    pub instruction: String,
    /// Separator placed between consecutive context chunks.
    pub delimiter: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Render the prompt: context chunks in ranked order, then the
    /// instruction, then the question.
    ///
    /// With no chunks the context section is left empty.
    pub fn render(&self, question: &str, context_chunks: &[Chunk]) -> String {
        let context = context_chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.delimiter);
        format!("Context:\n{context}\n\n{}\n\nQuestion: {question}\nAnswer:", self.instruction)
    }
}

/// Builds a grounded prompt and asks a [`GenerationProvider`] to answer it.
#[derive(Debug, Clone, Default)]
pub struct AnswerSynthesizer {
    template: PromptTemplate,
}

impl AnswerSynthesizer {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Render the prompt for `question` over `context_chunks`.
    pub fn build_prompt(&self, question: &str, context_chunks: &[Chunk]) -> String {
        self.template.render(question, context_chunks)
    }

    /// Call `generator` exactly once with the assembled prompt and return its
    /// output unmodified.
    ///
    /// An empty `context_chunks` is not an error; the model is still asked.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::GenerationError`](crate::RagError::GenerationError)
    /// if the generator fails, whatever error it reported.
    pub async fn synthesize(
        &self,
        question: &str,
        context_chunks: &[Chunk],
        generator: &dyn GenerationProvider,
    ) -> Result<String> {
        let prompt = self.build_prompt(question, context_chunks);
        debug!(
            provider = generator.name(),
            context_chunks = context_chunks.len(),
            prompt_len = prompt.len(),
            "generating answer"
        );

        generator
            .generate(&prompt)
            .await
            .map_err(|e| e.into_generation(generator.name()))
            .inspect_err(|e| {
                error!(provider = generator.name(), error = %e, "generation failed");
            })
    }
}

/// Build a grounded prompt and generate an answer with the default template.
///
/// # Errors
///
/// See [`AnswerSynthesizer::synthesize`].
pub async fn synthesize(
    question: &str,
    context_chunks: &[Chunk],
    generator: &dyn GenerationProvider,
) -> Result<String> {
    AnswerSynthesizer::default().synthesize(question, context_chunks, generator).await
}
