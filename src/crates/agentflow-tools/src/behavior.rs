//! Adapter binding a tool as a step behavior.

use crate::tool::Tool;
use agentflow_core::{Behavior, BehaviorError, DataBag};
use async_trait::async_trait;
use serde_json::Value;

/// Step behavior that calls one tool.
///
/// The step's populated input slots are passed to the tool as its
/// argument object, and the tool's result is stored under `output_key`.
///
/// ```rust
/// use agentflow_core::{dispatch, Step};
/// use agentflow_tools::{builtin, ToolBehavior};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> anyhow::Result<()> {
/// let mut step = Step::new("parse").with_input("text", json!(null));
/// step.bind(Arc::new(ToolBehavior::new(builtin::json_parse(), "parsed")))?;
///
/// let mut bag = agentflow_core::state::bag_from([("text", json!(r#"{"ok": true}"#))]);
/// dispatch(&mut step, &mut bag).await?;
/// assert_eq!(bag["parsed"]["ok"], json!(true));
/// # Ok(())
/// # }
/// ```
pub struct ToolBehavior {
    tool: Tool,
    output_key: String,
}

impl ToolBehavior {
    pub fn new(tool: Tool, output_key: impl Into<String>) -> Self {
        Self {
            tool,
            output_key: output_key.into(),
        }
    }
}

#[async_trait]
impl Behavior for ToolBehavior {
    async fn execute(&self, inputs: &DataBag) -> Result<DataBag, BehaviorError> {
        let args = Value::Object(inputs.clone());
        let result = self.tool.run(args).await?;

        let mut outputs = DataBag::new();
        outputs.insert(self.output_key.clone(), result);
        Ok(outputs)
    }
}
