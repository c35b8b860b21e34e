use serde::{Deserialize, Serialize};

/// The overall voice the rewritten text should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Casual,
    #[default]
    Neutral,
}

/// How sophisticated the vocabulary and sentence structure should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    High,
    #[default]
    Medium,
    Low,
}

/// How far the rewrite is allowed to drift from the source phrasing.
///
/// This maps onto the provider's sampling temperature, not onto any
/// structural behavior of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Creativity {
    Conservative,
    #[default]
    Moderate,
    Creative,
}

/// The style configuration supplied once per job and forwarded unchanged to
/// every provider call within that job.
///
/// When `preserve_structure` is left unset the rewrite is allowed to
/// reorganize the text, so the field defaults to `false`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub tone: Tone,
    pub formality: Formality,
    pub creativity: Creativity,
    /// Also accepted as `preserveFormatting` on the wire.
    #[serde(alias = "preserveFormatting")]
    pub preserve_structure: bool,
    /// Provider model override. `None` falls back to the provider's default.
    pub model: Option<String>,
}
