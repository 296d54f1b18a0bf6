//! Error types for tool registration and execution.

use thiserror::Error;

/// Errors produced by the tool registry and by tool executors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Lookup of an unregistered tool name.
    #[error("tool '{0}' not found in registry")]
    NotFound(String),

    /// Registration under a name that is already taken.
    #[error("tool '{0}' already registered")]
    AlreadyRegistered(String),

    /// The argument object is missing a key or has the wrong shape.
    #[error("invalid arguments for tool '{tool}': {error}")]
    InvalidArguments { tool: String, error: String },

    /// The tool ran and failed.
    #[error("tool '{tool}' execution failed: {error}")]
    Execution { tool: String, error: String },
}

impl ToolError {
    pub fn invalid_arguments(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            error: error.into(),
        }
    }

    pub fn execution(tool: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Execution {
            tool: tool.into(),
            error: error.to_string(),
        }
    }
}

/// Convenience alias for tool results.
pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_tool() {
        let err = ToolError::execution("file_read", "no such file");
        assert_eq!(
            err.to_string(),
            "tool 'file_read' execution failed: no such file"
        );

        let err = ToolError::NotFound("missing".into());
        assert!(err.to_string().contains("'missing'"));
    }
}
