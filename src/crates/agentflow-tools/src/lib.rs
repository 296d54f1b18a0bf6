//! # agentflow-tools - Tools for agentflow Workflows
//!
//! Async [`Tool`]s callable with JSON argument objects, an explicit
//! [`ToolRegistry`], a set of built-in tools (file I/O, JSON helpers,
//! HTTP requests), and [`ToolBehavior`] for binding a tool directly to
//! a workflow step.
//!
//! ```rust
//! use agentflow_tools::builtin;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let registry = builtin::registry()?;
//! let parsed = registry
//!     .call("json_parse", json!({"text": r#"{"n": 1}"#}))
//!     .await?;
//! assert_eq!(parsed["n"], json!(1));
//! # Ok(())
//! # }
//! ```

pub mod behavior;
pub mod builtin;
pub mod error;
pub mod tool;

pub use behavior::ToolBehavior;
pub use error::{Result, ToolError};
pub use tool::{Tool, ToolExecutor, ToolFuture, ToolRegistry};
