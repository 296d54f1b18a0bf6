//! # agentflow-llm - Language Models for agentflow Workflows
//!
//! A provider-agnostic [`TextModel`] trait, `{var}` [`PromptTemplate`]s
//! rendered from the workflow data bag, an OpenAI-compatible HTTP client
//! ([`OpenAiModel`]), and [`LlmBehavior`] for binding a templated model
//! call to a workflow step.
//!
//! ```rust,no_run
//! use agentflow_llm::{LlmBehavior, OpenAiConfig, OpenAiModel, PromptTemplate};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let model = OpenAiModel::new(OpenAiConfig::from_env("gpt-4o-mini")?)?;
//! let behavior = LlmBehavior::new(
//!     Arc::new(model),
//!     PromptTemplate::new("Summarize the following notes:\n{notes}"),
//!     "summary",
//! );
//! # let _ = behavior;
//! # Ok(())
//! # }
//! ```

pub mod behavior;
pub mod error;
pub mod model;
pub mod openai;
pub mod template;

pub use behavior::LlmBehavior;
pub use error::{LlmError, Result};
pub use model::TextModel;
pub use openai::{OpenAiConfig, OpenAiModel};
pub use template::PromptTemplate;
