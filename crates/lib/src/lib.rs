//! # Paraflow
//!
//! This crate implements the core of the document paraphrasing service: it
//! splits a document into bounded-size chunks, rewrites each chunk through a
//! configurable AI provider, stitches the rewritten chunks back together, and
//! tracks the lifecycle of every submitted job.

pub mod chunker;
pub mod engine;
pub mod errors;
pub mod extract;
pub mod jobs;
pub mod pacing;
pub mod prompts;
pub mod providers;
pub mod reconstruct;
pub mod rewriter;
pub mod types;

pub use chunker::{chunk_text, Chunk, ChunkerError};
pub use engine::{EngineConfig, EngineError, ParaphraseEngine};
pub use errors::ProviderError;
pub use extract::{extract_text, ExtractError, ExtractedDocument, FileType};
pub use jobs::{Job, JobError, JobQueue, JobStatus, StatusTracker, Worker, WorkerConfig};
pub use providers::ai::{AiProvider, GenerationParams};
pub use reconstruct::reconstruct_document;
pub use rewriter::RewrittenChunk;
pub use types::{Creativity, Formality, StyleConfig, Tone};
