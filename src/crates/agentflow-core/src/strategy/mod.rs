//! Traversal strategies and the strategy registry.
//!
//! A strategy decides the order in which a workflow's steps execute.
//! All strategies share the same contract: ask the graph for start
//! steps, dispatch steps one at a time (execution is strictly
//! sequential - every dispatch completes before the next begins), and
//! fold step outputs into the data bag. They differ in traversal order
//! and in how the bag is shared between branches:
//!
//! - [`DepthFirst`] threads one mutable bag through every branch, so
//!   later branches observe earlier branches' outputs.
//! - [`BreadthFirst`] gives each branch a snapshot copy; the caller's
//!   bag is deliberately left unmodified (see the impl notes).
//! - [`GuidedSearch`] refines a Monte-Carlo search tree before
//!   executing the highest-value path it found.
//!
//! Strategies are looked up by name through an explicit
//! [`StrategyRegistry`] passed around by the caller; there is no
//! process-global registry.
//!
//! # Example
//!
//! ```rust
//! use agentflow_core::{Step, StrategyRegistry, WorkflowGraph, state::bag_from};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> agentflow_core::Result<()> {
//! let mut graph = WorkflowGraph::new("hello");
//! graph.add_step(
//!     Step::new("only").with_behavior_fn(|_| Ok(bag_from([("x", json!(1))]))),
//! )?;
//!
//! let registry = StrategyRegistry::with_defaults();
//! let mut bag = Default::default();
//! registry.execute(&mut graph, "dfs", &mut bag).await?;
//! assert_eq!(bag["x"], json!(1));
//! # Ok(())
//! # }
//! ```

mod breadth_first;
mod depth_first;
mod guided;

pub use breadth_first::BreadthFirst;
pub use depth_first::DepthFirst;
pub use guided::{GuidedSearch, RewardFn};

use crate::error::{FlowError, Result};
use crate::graph::WorkflowGraph;
use crate::state::DataBag;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A pluggable traversal algorithm.
///
/// The graph is borrowed mutably because dispatch accumulates state on
/// each step; one traversal owns the graph for its whole run. The bag is
/// borrowed mutably so partial mutations made before a mid-traversal
/// failure remain visible to the caller - there is no rollback.
#[async_trait]
pub trait TraversalStrategy: Send + Sync {
    /// Registry name of this strategy.
    fn name(&self) -> &'static str;

    /// Traverse the graph, dispatching steps and folding outputs into
    /// `bag`.
    async fn run(&self, graph: &mut WorkflowGraph, bag: &mut DataBag) -> Result<()>;
}

impl std::fmt::Debug for dyn TraversalStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraversalStrategy")
            .field("name", &self.name())
            .finish()
    }
}

/// Explicit name → strategy lookup passed into the engine by the caller.
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn TraversalStrategy>>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Create a registry with the built-in strategies registered under
    /// `"dfs"`, `"bfs"`, and `"mcts"`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DepthFirst));
        registry.register(Arc::new(BreadthFirst));
        registry.register(Arc::new(GuidedSearch::new()));
        registry
    }

    /// Register a strategy under its own name, replacing any previous
    /// registration of that name.
    pub fn register(&mut self, strategy: Arc<dyn TraversalStrategy>) {
        self.strategies
            .insert(strategy.name().to_string(), strategy);
    }

    /// Look up a strategy by name.
    ///
    /// # Errors
    ///
    /// [`FlowError::StrategyNotFound`] for unregistered names.
    pub fn get(&self, name: &str) -> Result<Arc<dyn TraversalStrategy>> {
        self.strategies
            .get(name)
            .cloned()
            .ok_or_else(|| FlowError::StrategyNotFound(name.to_string()))
    }

    /// Names of all registered strategies.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    /// Execute the named strategy against the graph.
    ///
    /// The caller owns `bag` and must treat it as possibly mutated in
    /// place; strategies differ on whether the final result lands there
    /// (see [`BreadthFirst`]).
    pub async fn execute(
        &self,
        graph: &mut WorkflowGraph,
        strategy: &str,
        bag: &mut DataBag,
    ) -> Result<()> {
        let strategy = self.get(strategy)?;
        tracing::info!(
            workflow = %graph.name,
            strategy = strategy.name(),
            steps = graph.len(),
            "executing workflow"
        );
        strategy.run(graph, bag).await
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
