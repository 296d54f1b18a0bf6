//! The tool abstraction and the explicit tool registry.
//!
//! A [`Tool`] is a named async function over a JSON argument object. Tools
//! live in an explicit [`ToolRegistry`] owned and passed around by the
//! caller; there is no process-global registry.

use crate::error::{Result, ToolError};
use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Future type returned by tool executors.
pub type ToolFuture = BoxFuture<'static, Result<Value>>;

/// Tool executor function type.
pub type ToolExecutor = Arc<dyn Fn(Value) -> ToolFuture + Send + Sync>;

/// A named async capability callable with a JSON argument object.
#[derive(Clone)]
pub struct Tool {
    /// Registry name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    executor: ToolExecutor,
}

impl Tool {
    /// Create a tool from an executor closure.
    ///
    /// The closure receives the argument object and returns a boxed
    /// future; wrap async bodies with `Box::pin`:
    ///
    /// ```rust
    /// use agentflow_tools::Tool;
    /// use serde_json::json;
    ///
    /// let echo = Tool::new("echo", "return the arguments unchanged", |args| {
    ///     Box::pin(async move { Ok(args) })
    /// });
    /// assert_eq!(echo.name, "echo");
    /// ```
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, executor: F) -> Self
    where
        F: Fn(Value) -> ToolFuture + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            executor: Arc::new(executor),
        }
    }

    /// Run the tool with the given argument object.
    pub async fn run(&self, args: Value) -> Result<Value> {
        debug!(tool = %self.name, "running tool");
        (self.executor)(args).await
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Explicit name → tool lookup owned by the caller.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its own name.
    ///
    /// # Errors
    ///
    /// [`ToolError::AlreadyRegistered`] if the name is taken; the
    /// registry is left unmodified.
    pub fn register(&mut self, tool: Tool) -> Result<()> {
        if self.tools.contains_key(&tool.name) {
            return Err(ToolError::AlreadyRegistered(tool.name));
        }
        self.tools.insert(tool.name.clone(), tool);
        Ok(())
    }

    /// Look up a tool by name.
    ///
    /// # Errors
    ///
    /// [`ToolError::NotFound`] for unregistered names.
    pub fn get(&self, name: &str) -> Result<&Tool> {
        self.tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Names of all registered tools.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Look up and run a tool in one call.
    pub async fn call(&self, name: &str, args: Value) -> Result<Value> {
        self.get(name)?.run(args).await
    }
}
