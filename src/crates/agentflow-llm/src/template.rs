//! `{var}` prompt templates rendered from the data bag.

use crate::error::{LlmError, Result};
use agentflow_core::DataBag;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// A prompt with `{variable}` placeholders.
///
/// ```rust
/// use agentflow_core::state::bag_from;
/// use agentflow_llm::PromptTemplate;
/// use serde_json::json;
///
/// let template = PromptTemplate::new("Summarize {notes} in {count} bullets.");
/// assert_eq!(template.variables(), vec!["notes", "count"]);
///
/// let bag = bag_from([("notes", json!("the findings")), ("count", json!(3))]);
/// let prompt = template.render(&bag).unwrap();
/// assert_eq!(prompt, "Summarize the findings in 3 bullets.");
/// ```
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The raw template text.
    pub fn text(&self) -> &str {
        &self.template
    }

    /// Placeholder names in order of appearance, duplicates included.
    pub fn variables(&self) -> Vec<&str> {
        VAR_PATTERN
            .captures_iter(&self.template)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Substitute every placeholder from the bag.
    ///
    /// String values are inserted verbatim; any other value is inserted
    /// as compact JSON.
    ///
    /// # Errors
    ///
    /// [`LlmError::MissingVariable`] naming the first placeholder with
    /// no matching bag key.
    pub fn render(&self, bag: &DataBag) -> Result<String> {
        let mut rendered = String::with_capacity(self.template.len());
        let mut last = 0;
        for placeholder in VAR_PATTERN.find_iter(&self.template) {
            // Strip the surrounding braces to get the variable name.
            let name = &self.template[placeholder.start() + 1..placeholder.end() - 1];
            let value = bag
                .get(name)
                .ok_or_else(|| LlmError::MissingVariable(name.to_string()))?;

            rendered.push_str(&self.template[last..placeholder.start()]);
            match value {
                Value::String(s) => rendered.push_str(s),
                other => rendered.push_str(&other.to_string()),
            }
            last = placeholder.end();
        }
        rendered.push_str(&self.template[last..]);
        Ok(rendered)
    }
}
