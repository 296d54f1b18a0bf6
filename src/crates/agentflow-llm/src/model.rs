//! The text-generation capability behind LLM-backed steps.

use crate::error::Result;
use async_trait::async_trait;

/// An opaque prompt-in, text-out model.
///
/// The engine never inspects prompts or completions; anything that can
/// turn a string into a string can back a workflow step. See
/// [`OpenAiModel`](crate::OpenAiModel) for the shipped HTTP client.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a completion for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
