//! # Ask the Doc
//!
//! Answers a question about a text file using OpenAI embeddings and chat
//! completions.
//!
//! Run:
//!
//! ```text
//! OPENAI_API_KEY=sk-... cargo run -p askdoc-demos --example ask_doc -- notes.txt "Why?"
//! ```
//!
//! Chunking can be tuned with `ASKDOC_CHUNK_SIZE`, `ASKDOC_CHUNK_OVERLAP`
//! and `ASKDOC_TOP_K`.

use std::sync::Arc;

use anyhow::Context;
use askdoc_demos::{config_from_env, init_tracing};
use askdoc_rag::openai::{OpenAICompletionProvider, OpenAIEmbeddingProvider};
use askdoc_rag::{ErrorKind, answer_question};

fn user_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => "The chunking settings are invalid.",
        ErrorKind::EmptyDocument => "The uploaded document is empty.",
        ErrorKind::Embedding => "The document could not be indexed. Check your API key and quota.",
        ErrorKind::DimensionMismatch => "The embedding model returned inconsistent vectors.",
        ErrorKind::Generation => "The answer could not be generated. Check your API key and quota.",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(question)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: ask_doc <document.txt> <question>");
    };

    let document =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let config = config_from_env()?;

    let embedder = Arc::new(OpenAIEmbeddingProvider::from_env()?);
    let llm = Arc::new(OpenAICompletionProvider::from_env()?);

    match answer_question(&document, &question, &config, embedder, llm).await {
        Ok(answer) => {
            println!("{answer}");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "ask_doc failed");
            anyhow::bail!("{}", user_message(e.kind()))
        }
    }
}
