//! Prompt templates for the paraphrasing provider calls.
//!
//! The system prompt is assembled per-job from the style configuration; the
//! user prompt carries the chunk text. Placeholders use `{name}` syntax and
//! are filled with simple string replacement.

pub const PARAPHRASE_SYSTEM_PROMPT_TEMPLATE: &str = r#"You are an expert paraphrasing assistant. Your task is to rewrite the given text while:
1. Preserving the original meaning completely
2. {tone_instruction}
3. {formality_instruction}
4. {formatting_instruction}
5. Maintaining factual accuracy
6. Keeping approximately the same length

Do not add commentary, explanations, or notes. Return only the paraphrased text."#;

pub const PARAPHRASE_USER_PROMPT_TEMPLATE: &str =
    "Please paraphrase the following text:\n\n{text}";
