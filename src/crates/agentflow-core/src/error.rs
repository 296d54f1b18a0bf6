//! Error types for workflow construction and execution.
//!
//! All errors implement `std::error::Error` via the `thiserror` crate and
//! are surfaced synchronously to the immediate caller of the failing
//! operation. Nothing is retried automatically: a dispatch failure
//! mid-traversal aborts the remainder of that traversal call, leaving the
//! data bag and any already-written step outputs in whatever state they
//! reached.
//!
//! # Example
//!
//! ```rust
//! use agentflow_core::{FlowError, Step, WorkflowGraph};
//!
//! let mut graph = WorkflowGraph::new("demo");
//! graph.add_step(Step::new("a")).unwrap();
//!
//! match graph.add_step(Step::new("a")) {
//!     Err(FlowError::DuplicateStep(id)) => assert_eq!(id, "a"),
//!     other => panic!("expected duplicate id error, got {:?}", other),
//! }
//! ```

use thiserror::Error;

/// Convenience result type using [`FlowError`].
pub type Result<T> = std::result::Result<T, FlowError>;

/// Errors produced by graph construction, dispatch, and traversal.
#[derive(Error, Debug)]
pub enum FlowError {
    /// A step with this id is already registered in the graph.
    ///
    /// The graph is left unmodified.
    #[error("step '{0}' already exists in workflow")]
    DuplicateStep(String),

    /// An edge endpoint references a step id the graph does not contain.
    ///
    /// The graph is left unmodified.
    #[error("step '{0}' does not exist in workflow")]
    UnknownStep(String),

    /// A traversal strategy found no step with zero in-degree.
    ///
    /// This fires immediately, before any step is dispatched. A graph
    /// whose every step sits on a cycle has no start steps.
    #[error("workflow '{workflow}' has no start steps")]
    NoStartSteps {
        /// Name of the workflow that could not be started.
        workflow: String,
    },

    /// A step was dispatched before a behavior was bound to it.
    ///
    /// Bag mutations made by earlier steps in the same traversal are
    /// retained; there is no rollback.
    #[error("no behavior bound for step '{step}'")]
    MissingBehavior {
        /// Id of the step missing a behavior.
        step: String,
    },

    /// A step's behavior returned an error during dispatch.
    #[error("behavior for step '{step}' failed: {error}")]
    Behavior {
        /// Id of the step whose behavior failed.
        step: String,
        /// Error message from the behavior.
        error: String,
    },

    /// Lookup of a strategy name that was never registered.
    #[error("strategy '{0}' is not registered")]
    StrategyNotFound(String),

    /// Invalid step or engine configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl FlowError {
    /// Create a [`FlowError::Behavior`] with step context.
    pub fn behavior(step: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Behavior {
            step: step.into(),
            error: error.into(),
        }
    }

    /// Create a [`FlowError::NoStartSteps`] for the named workflow.
    pub fn no_start_steps(workflow: impl Into<String>) -> Self {
        Self::NoStartSteps {
            workflow: workflow.into(),
        }
    }

    /// Create a [`FlowError::MissingBehavior`] for the given step id.
    pub fn missing_behavior(step: impl Into<String>) -> Self {
        Self::MissingBehavior { step: step.into() }
    }
}
