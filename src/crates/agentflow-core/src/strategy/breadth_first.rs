//! Breadth-first traversal.

use super::TraversalStrategy;
use crate::dispatch::dispatch;
use crate::error::{FlowError, Result};
use crate::graph::WorkflowGraph;
use crate::state::DataBag;
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Queue-based level-order traversal with per-branch bag snapshots.
///
/// The queue is seeded with every start step paired with its own clone
/// of the initial bag, so sibling branches do not observe each other's
/// outputs at enqueue time (unlike [`DepthFirst`](super::DepthFirst)).
/// When a step is dispatched, its successors are enqueued with that
/// branch's updated bag. Visited tracking is global per run: a step
/// re-enqueued through multiple predecessors is dropped on dequeue.
///
/// The caller's bag is deliberately left unmodified; branch bags are
/// disconnected copies, and branch results live only in those snapshots
/// and in the steps' accumulated outputs. Callers that need the merged
/// result should read step outputs or use a different strategy.
pub struct BreadthFirst;

#[async_trait]
impl TraversalStrategy for BreadthFirst {
    fn name(&self) -> &'static str {
        "bfs"
    }

    async fn run(&self, graph: &mut WorkflowGraph, bag: &mut DataBag) -> Result<()> {
        let starts: Vec<String> = graph.start_steps().iter().map(|s| s.to_string()).collect();
        if starts.is_empty() {
            return Err(FlowError::no_start_steps(&graph.name));
        }

        let mut queue: VecDeque<(String, DataBag)> = starts
            .into_iter()
            .map(|id| (id, bag.clone()))
            .collect();
        let mut visited: HashSet<String> = HashSet::new();

        while let Some((id, mut branch_bag)) = queue.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }
            dispatch(graph.step_mut(&id)?, &mut branch_bag).await?;

            let successors: Vec<String> =
                graph.successors(&id).iter().map(|s| s.to_string()).collect();
            for next in successors {
                if !visited.contains(&next) {
                    queue.push_back((next, branch_bag.clone()));
                }
            }
        }

        debug!(visited = visited.len(), "breadth-first traversal complete");
        Ok(())
    }
}
