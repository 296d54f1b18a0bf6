//! Steps and the behavior capability bound to them.
//!
//! A [`Step`] is a named unit of work: a set of declared input slots, an
//! accumulating output map, and exactly one [`Behavior`] supplying the
//! executable logic. The behavior is the sole extension point for step
//! logic - LLM calls, tool invocations, plain functions - and is opaque
//! to the engine.
//!
//! # Example
//!
//! ```rust
//! use agentflow_core::{Step, state::bag_from};
//! use serde_json::json;
//!
//! let mut step = Step::new("summarize")
//!     .with_name("Summarize")
//!     .with_input("text", json!(null));
//!
//! step.bind_fn(|inputs| {
//!     let text = inputs["text"].as_str().unwrap_or_default();
//!     Ok(bag_from([("summary", json!(text.len()))]))
//! }).unwrap();
//! ```

use crate::error::{FlowError, Result};
use crate::state::DataBag;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Error type returned by behavior implementations.
///
/// The dispatcher wraps these with step context as
/// [`FlowError::Behavior`](crate::FlowError::Behavior).
pub type BehaviorError = Box<dyn std::error::Error + Send + Sync>;

/// Executable capability bound to a step.
///
/// Implementations receive the step's input slots (already populated
/// from the data bag by the dispatcher) and return the outputs to merge
/// into the step and the bag. Concrete variants shipped with agentflow:
///
/// - [`FnBehavior`] - a pure function (this crate)
/// - `ToolBehavior` - a registered tool (`agentflow-tools`)
/// - `LlmBehavior` - a prompt template against a text model
///   (`agentflow-llm`)
#[async_trait]
pub trait Behavior: Send + Sync {
    /// Run the behavior against the step's populated inputs.
    async fn execute(&self, inputs: &DataBag) -> std::result::Result<DataBag, BehaviorError>;
}

type BehaviorFn =
    dyn Fn(&DataBag) -> std::result::Result<DataBag, BehaviorError> + Send + Sync;

/// Pure-function behavior wrapping a synchronous closure.
pub struct FnBehavior {
    func: Arc<BehaviorFn>,
}

impl FnBehavior {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&DataBag) -> std::result::Result<DataBag, BehaviorError> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl Behavior for FnBehavior {
    async fn execute(&self, inputs: &DataBag) -> std::result::Result<DataBag, BehaviorError> {
        (self.func)(inputs)
    }
}

/// A named unit of work in a workflow graph.
///
/// - `inputs` declares named input slots; on each dispatch, slots are
///   refreshed from the data bag (bag keys without a matching slot are
///   ignored, slots without a matching bag key keep their last value).
/// - `outputs` accumulates across invocations and is never cleared:
///   values produced by an earlier run remain visible to a later run
///   unless overwritten.
/// - `behavior` must be bound exactly once, before the first dispatch.
#[derive(Clone)]
pub struct Step {
    /// Unique id within the owning graph. Immutable once created.
    pub id: String,
    /// Display name. No behavioral effect.
    pub name: String,
    /// Free-form description. No behavioral effect.
    pub description: String,
    /// Declared input slots with their last-known values.
    pub inputs: DataBag,
    /// Produced outputs, accumulated across invocations.
    pub outputs: DataBag,
    behavior: Option<Arc<dyn Behavior>>,
}

impl Step {
    /// Create a step with the given id. The display name defaults to the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            inputs: DataBag::new(),
            outputs: DataBag::new(),
            behavior: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare an input slot with a default value.
    ///
    /// Only declared slots are populated from the data bag at dispatch
    /// time; undeclared bag keys are invisible to the behavior.
    pub fn with_input(mut self, key: impl Into<String>, default: Value) -> Self {
        self.inputs.insert(key.into(), default);
        self
    }

    /// Pre-seed an output value.
    pub fn with_output(mut self, key: impl Into<String>, value: Value) -> Self {
        self.outputs.insert(key.into(), value);
        self
    }

    /// Builder form of [`bind_fn`](Self::bind_fn). Panics if a behavior
    /// is already bound, which cannot happen mid-chain on a fresh step.
    pub fn with_behavior_fn<F>(mut self, func: F) -> Self
    where
        F: Fn(&DataBag) -> std::result::Result<DataBag, BehaviorError> + Send + Sync + 'static,
    {
        self.behavior = Some(Arc::new(FnBehavior::new(func)));
        self
    }

    /// Bind the step's behavior. A step accepts exactly one behavior;
    /// binding twice is a configuration error.
    pub fn bind(&mut self, behavior: Arc<dyn Behavior>) -> Result<()> {
        if self.behavior.is_some() {
            return Err(FlowError::Configuration(format!(
                "behavior already bound for step '{}'",
                self.id
            )));
        }
        self.behavior = Some(behavior);
        Ok(())
    }

    /// Bind a synchronous closure as the step's behavior.
    pub fn bind_fn<F>(&mut self, func: F) -> Result<()>
    where
        F: Fn(&DataBag) -> std::result::Result<DataBag, BehaviorError> + Send + Sync + 'static,
    {
        self.bind(Arc::new(FnBehavior::new(func)))
    }

    /// The bound behavior, if any.
    pub fn behavior(&self) -> Option<Arc<dyn Behavior>> {
        self.behavior.clone()
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("behavior", &self.behavior.as_ref().map(|_| "<behavior>"))
            .finish()
    }
}
