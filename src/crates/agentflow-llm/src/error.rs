//! Error types for model clients and prompt templates.

use thiserror::Error;

/// Errors produced by text models and prompt rendering.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key in the config or the environment.
    #[error("API key is required; pass one explicitly or set {0}")]
    MissingApiKey(&'static str),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider answered 2xx but the body was not usable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A template placeholder had no matching bag key.
    #[error("missing template variable '{0}'")]
    MissingVariable(String),
}

impl LlmError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

/// Convenience alias for model results.
pub type Result<T> = std::result::Result<T, LlmError>;
