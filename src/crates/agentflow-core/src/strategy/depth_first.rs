//! Depth-first traversal.

use super::TraversalStrategy;
use crate::dispatch::dispatch;
use crate::error::{FlowError, Result};
use crate::graph::WorkflowGraph;
use crate::state::DataBag;
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

/// Deterministic pre-order traversal threading one shared bag.
///
/// From each start step in turn, the traversal dispatches the step and
/// then descends into its successors, first successor's subtree first,
/// mutating the same bag throughout - later branches see earlier
/// branches' outputs. A single visited set spans the whole run, so each
/// step is dispatched at most once even on diamond-shaped or cyclic
/// graphs.
///
/// Uses an explicit stack rather than recursion, so traversal depth is
/// bounded by heap, not call stack.
pub struct DepthFirst;

#[async_trait]
impl TraversalStrategy for DepthFirst {
    fn name(&self) -> &'static str {
        "dfs"
    }

    async fn run(&self, graph: &mut WorkflowGraph, bag: &mut DataBag) -> Result<()> {
        let starts: Vec<String> = graph.start_steps().iter().map(|s| s.to_string()).collect();
        if starts.is_empty() {
            return Err(FlowError::no_start_steps(&graph.name));
        }

        let mut visited: HashSet<String> = HashSet::new();
        for start in starts {
            let mut stack = vec![start];
            while let Some(id) = stack.pop() {
                if !visited.insert(id.clone()) {
                    continue;
                }
                dispatch(graph.step_mut(&id)?, bag).await?;

                // Reverse push so the first successor's subtree is
                // explored before its siblings (pre-order).
                let successors: Vec<String> =
                    graph.successors(&id).iter().map(|s| s.to_string()).collect();
                for next in successors.into_iter().rev() {
                    if !visited.contains(&next) {
                        stack.push(next);
                    }
                }
            }
        }

        debug!(visited = visited.len(), "depth-first traversal complete");
        Ok(())
    }
}
