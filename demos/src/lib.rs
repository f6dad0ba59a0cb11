//! Helpers shared by the askdoc demos.

use std::str::FromStr;

use askdoc_rag::{RagConfig, RagConfigBuilder};

fn env_override<T: FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{name} must be a non-negative integer, got '{value}'")),
        Err(_) => Ok(None),
    }
}

/// Build a [`RagConfig`] from the defaults, overridden by `ASKDOC_CHUNK_SIZE`,
/// `ASKDOC_CHUNK_OVERLAP` and `ASKDOC_TOP_K` when set.
pub fn config_from_env() -> anyhow::Result<RagConfig> {
    let mut builder: RagConfigBuilder = RagConfig::builder();
    if let Some(size) = env_override("ASKDOC_CHUNK_SIZE")? {
        builder = builder.chunk_size(size);
    }
    if let Some(overlap) = env_override("ASKDOC_CHUNK_OVERLAP")? {
        builder = builder.chunk_overlap(overlap);
    }
    if let Some(k) = env_override("ASKDOC_TOP_K")? {
        builder = builder.top_k(k);
    }
    Ok(builder.build()?)
}

/// Install a fmt subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
