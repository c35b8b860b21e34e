//! Turns one chunk into its rewritten counterpart via a single provider call.

use crate::{
    chunker::Chunk,
    errors::ProviderError,
    prompts::{PARAPHRASE_SYSTEM_PROMPT_TEMPLATE, PARAPHRASE_USER_PROMPT_TEMPLATE},
    providers::ai::{AiProvider, GenerationParams},
    types::{Creativity, Formality, StyleConfig, Tone},
};

/// Hard ceiling on the completion budget requested per chunk.
const MAX_OUTPUT_TOKENS: u32 = 8000;

/// A chunk paired with its rewritten text, carrying the index through so the
/// reconstruction step can sort by original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenChunk {
    pub index: usize,
    pub original_text: String,
    pub rewritten_text: String,
}

/// Rewrites a single chunk according to `config`.
///
/// The returned text is trimmed; a whitespace-only completion is treated as
/// an empty provider response.
pub async fn rewrite_chunk(
    provider: &dyn AiProvider,
    chunk: &Chunk,
    config: &StyleConfig,
) -> Result<RewrittenChunk, ProviderError> {
    let system_prompt = build_system_prompt(config);
    let user_prompt = PARAPHRASE_USER_PROMPT_TEMPLATE.replace("{text}", &chunk.text);
    let params = generation_params(&chunk.text, config);

    let rewritten = provider
        .generate(&system_prompt, &user_prompt, &params)
        .await?;
    let rewritten = rewritten.trim().to_string();
    if rewritten.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    Ok(RewrittenChunk {
        index: chunk.index,
        original_text: chunk.text.clone(),
        rewritten_text: rewritten,
    })
}

pub fn build_system_prompt(config: &StyleConfig) -> String {
    PARAPHRASE_SYSTEM_PROMPT_TEMPLATE
        .replace("{tone_instruction}", tone_instruction(config.tone))
        .replace(
            "{formality_instruction}",
            formality_instruction(config.formality),
        )
        .replace(
            "{formatting_instruction}",
            formatting_instruction(config.preserve_structure),
        )
}

pub fn generation_params(chunk_text: &str, config: &StyleConfig) -> GenerationParams {
    let chars = chunk_text.chars().count() as u32;
    GenerationParams {
        model: config.model.clone(),
        temperature: temperature_for(config.creativity),
        max_tokens: (chars * 2).min(MAX_OUTPUT_TOKENS),
    }
}

fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Formal => {
            "Using a formal, professional tone suitable for academic or business contexts"
        }
        Tone::Casual => "Using a casual, conversational tone that is easy to read",
        Tone::Neutral => "Using a neutral, balanced tone",
    }
}

fn formality_instruction(formality: Formality) -> &'static str {
    match formality {
        Formality::High => "Employing sophisticated vocabulary and complex sentence structures",
        Formality::Low => "Using simple, straightforward language accessible to all readers",
        Formality::Medium => "Balancing clarity with appropriate vocabulary",
    }
}

fn formatting_instruction(preserve_structure: bool) -> &'static str {
    if preserve_structure {
        "Preserve the original document structure, including paragraph breaks, lists, and formatting cues."
    } else {
        "You may reorganize the text for better clarity, but maintain the overall meaning."
    }
}

fn temperature_for(creativity: Creativity) -> f32 {
    match creativity {
        Creativity::Conservative => 0.3,
        Creativity::Moderate => 0.6,
        Creativity::Creative => 0.9,
    }
}
