//! The chunk-rewrite-reconstruct pipeline.

use crate::{
    chunker::{chunk_text, ChunkerError},
    errors::ProviderError,
    pacing::Pacer,
    providers::ai::AiProvider,
    reconstruct::reconstruct_document,
    rewriter::rewrite_chunk,
    types::StyleConfig,
};
use futures::future::BoxFuture;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Tuning knobs for the pipeline, independent of any single job's style.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_chunk_size: usize,
    pub overlap_size: usize,
    /// Minimum delay between successive provider calls.
    pub pacing_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 4000,
            overlap_size: 200,
            pacing_interval: Duration::from_millis(1000),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Chunker(#[from] ChunkerError),
    #[error("Failed at chunk {current}/{total}: {source}")]
    Chunk {
        current: usize,
        total: usize,
        #[source]
        source: ProviderError,
    },
}

/// Drives a whole document through chunking, sequential rewriting, and
/// reconstruction.
pub struct ParaphraseEngine {
    provider: Box<dyn AiProvider>,
    config: EngineConfig,
}

impl ParaphraseEngine {
    pub fn new(provider: Box<dyn AiProvider>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Rewrites `text` per `style`, invoking `on_progress(completed, total)`
    /// after each chunk finishes.
    ///
    /// Chunks are processed strictly one at a time and in order; a provider
    /// failure aborts the whole run. Whitespace-only input short-circuits to
    /// an empty result without any provider calls.
    pub async fn paraphrase_document<F>(
        &self,
        text: &str,
        style: &StyleConfig,
        mut on_progress: F,
    ) -> Result<String, EngineError>
    where
        F: FnMut(usize, usize) -> BoxFuture<'static, ()>,
    {
        let chunks = chunk_text(text, self.config.max_chunk_size, self.config.overlap_size)?;
        let total = chunks.len();
        if total == 0 {
            warn!("document produced no chunks, returning empty output");
            return Ok(String::new());
        }
        info!(total_chunks = total, "starting paraphrase run");

        let mut pacer = Pacer::new(self.config.pacing_interval);
        let mut rewritten = Vec::with_capacity(total);
        for (i, chunk) in chunks.iter().enumerate() {
            pacer.acquire().await;
            let result = rewrite_chunk(self.provider.as_ref(), chunk, style)
                .await
                .map_err(|source| EngineError::Chunk {
                    current: i + 1,
                    total,
                    source,
                })?;
            debug!(chunk = i + 1, total, "chunk rewritten");
            rewritten.push(result);
            on_progress(i + 1, total).await;
        }

        Ok(reconstruct_document(&rewritten))
    }
}
