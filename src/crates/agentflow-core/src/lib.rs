//! # agentflow-core - Workflow Graphs with Pluggable Traversal
//!
//! Build directed workflows of [`Step`]s and execute them with a
//! [`TraversalStrategy`] of your choice. Steps carry declared input
//! slots and accumulating outputs; strategies decide visit order and
//! thread a shared JSON data bag through each dispatch.
//!
//! ## Core Concepts
//!
//! - **[`Step`]** - a named unit of work with declared input slots, an
//!   accumulating output map, and exactly one bound [`Behavior`].
//! - **[`WorkflowGraph`]** - owned steps plus directed, optionally
//!   condition-tagged edges. Cycles are allowed; strategies guard with
//!   visited sets.
//! - **[`dispatch`]** - runs one step against the bag: copy declared
//!   inputs in, execute the behavior, merge outputs back out.
//! - **[`TraversalStrategy`]** - the execution-order seam. Built-ins:
//!   [`DepthFirst`] (shared bag, pre-order), [`BreadthFirst`]
//!   (per-branch snapshots), [`GuidedSearch`] (Monte-Carlo tree
//!   search). Looked up by name through a [`StrategyRegistry`].
//!
//! ## Quick Start
//!
//! ```rust
//! use agentflow_core::{Step, StrategyRegistry, WorkflowGraph, state::bag_from};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> agentflow_core::Result<()> {
//! let mut graph = WorkflowGraph::new("greeter");
//! graph.add_step(
//!     Step::new("greet")
//!         .with_input("who", json!("world"))
//!         .with_behavior_fn(|inputs| {
//!             let who = inputs["who"].as_str().unwrap_or_default();
//!             Ok(bag_from([("greeting", json!(format!("hello, {who}")))]))
//!         }),
//! )?;
//!
//! let registry = StrategyRegistry::with_defaults();
//! let mut bag = bag_from([("who", json!("agentflow"))]);
//! registry.execute(&mut graph, "dfs", &mut bag).await?;
//! assert_eq!(bag["greeting"], json!("hello, agentflow"));
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod error;
pub mod graph;
pub mod state;
pub mod step;
pub mod strategy;

pub use dispatch::dispatch;
pub use error::{FlowError, Result};
pub use graph::{Edge, StepId, WorkflowGraph};
pub use state::DataBag;
pub use step::{Behavior, BehaviorError, FnBehavior, Step};
pub use strategy::{
    BreadthFirst, DepthFirst, GuidedSearch, RewardFn, StrategyRegistry, TraversalStrategy,
};
