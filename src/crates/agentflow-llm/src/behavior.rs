//! Adapter binding a prompt template and a text model as a step behavior.

use crate::model::TextModel;
use crate::template::PromptTemplate;
use agentflow_core::{Behavior, BehaviorError, DataBag};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Step behavior that renders a template from the step's inputs, asks
/// the model for a completion, and stores it under `output_key`.
pub struct LlmBehavior {
    model: Arc<dyn TextModel>,
    template: PromptTemplate,
    output_key: String,
}

impl LlmBehavior {
    pub fn new(
        model: Arc<dyn TextModel>,
        template: PromptTemplate,
        output_key: impl Into<String>,
    ) -> Self {
        Self {
            model,
            template,
            output_key: output_key.into(),
        }
    }
}

#[async_trait]
impl Behavior for LlmBehavior {
    async fn execute(&self, inputs: &DataBag) -> Result<DataBag, BehaviorError> {
        let prompt = self.template.render(inputs)?;
        debug!(prompt_len = prompt.len(), "rendered prompt");
        let completion = self.model.generate(&prompt).await?;

        let mut outputs = DataBag::new();
        outputs.insert(self.output_key.clone(), Value::String(completion));
        Ok(outputs)
    }
}
