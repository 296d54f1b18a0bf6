//! The workflow graph: owned steps plus directed, optionally-labeled edges.
//!
//! A [`WorkflowGraph`] is built once by the caller before any strategy
//! runs. Its structure (steps and edges) is never mutated during
//! traversal; step input/output state is (see the `dispatch` module).
//! Cycles are permitted - strategies tolerate them via visited-set
//! checks, and a graph whose every step sits on a cycle simply has no
//! start steps.
//!
//! Edge `condition` tags are stored and queryable but not evaluated by
//! any shipped strategy; they are advisory metadata for callers that
//! route externally.
//!
//! # Example
//!
//! ```rust
//! use agentflow_core::{Step, WorkflowGraph};
//!
//! let mut graph = WorkflowGraph::new("diamond");
//! for id in ["a", "b", "c", "d"] {
//!     graph.add_step(Step::new(id)).unwrap();
//! }
//! graph.connect("a", "b", None).unwrap();
//! graph.connect("a", "c", None).unwrap();
//! graph.connect("b", "d", None).unwrap();
//! graph.connect("c", "d", Some("approved".into())).unwrap();
//!
//! assert_eq!(graph.start_steps(), vec!["a"]);
//! assert_eq!(graph.end_steps(), vec!["d"]);
//! assert_eq!(graph.successors("a"), vec!["b", "c"]);
//! ```

use crate::error::{FlowError, Result};
use crate::step::Step;
use std::collections::{HashMap, HashSet};

/// Step identifier - unique name for each step within a graph.
pub type StepId = String;

/// A directed edge with an optional advisory condition tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Target step id.
    pub to: StepId,
    /// Advisory label; stored but never evaluated by the engine.
    pub condition: Option<String>,
}

/// Directed workflow of steps.
pub struct WorkflowGraph {
    /// Workflow name. Metadata only.
    pub name: String,
    /// Workflow description. Metadata only.
    pub description: String,
    steps: HashMap<StepId, Step>,
    /// Step ids in insertion order; keeps start-step iteration stable.
    order: Vec<StepId>,
    adjacency: HashMap<StepId, Vec<Edge>>,
}

impl WorkflowGraph {
    /// Create an empty workflow graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            steps: HashMap::new(),
            order: Vec::new(),
            adjacency: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a step to the graph.
    ///
    /// # Errors
    ///
    /// [`FlowError::DuplicateStep`] if the id is already registered; the
    /// graph is left unmodified.
    pub fn add_step(&mut self, step: Step) -> Result<()> {
        if self.steps.contains_key(&step.id) {
            return Err(FlowError::DuplicateStep(step.id.clone()));
        }
        self.order.push(step.id.clone());
        self.steps.insert(step.id.clone(), step);
        Ok(())
    }

    /// Connect two steps with a directed edge.
    ///
    /// Connecting the same `(from, to)` pair again overwrites the stored
    /// condition (last write wins); it never creates a parallel edge.
    ///
    /// # Errors
    ///
    /// [`FlowError::UnknownStep`] if either endpoint is absent; the graph
    /// is left unmodified.
    pub fn connect(
        &mut self,
        from: impl AsRef<str>,
        to: impl AsRef<str>,
        condition: Option<String>,
    ) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();
        if !self.steps.contains_key(from) {
            return Err(FlowError::UnknownStep(from.to_string()));
        }
        if !self.steps.contains_key(to) {
            return Err(FlowError::UnknownStep(to.to_string()));
        }

        let edges = self.adjacency.entry(from.to_string()).or_default();
        match edges.iter_mut().find(|e| e.to == to) {
            Some(edge) => edge.condition = condition,
            None => edges.push(Edge {
                to: to.to_string(),
                condition,
            }),
        }
        Ok(())
    }

    /// Ids of the immediate successors of `id`, in edge insertion order.
    ///
    /// Unknown ids yield an empty list; successor queries are pure.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.adjacency
            .get(id)
            .map(|edges| edges.iter().map(|e| e.to.as_str()).collect())
            .unwrap_or_default()
    }

    /// Outgoing edges of `id`, including condition tags.
    pub fn outgoing(&self, id: &str) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Steps with zero in-degree, in insertion order.
    ///
    /// Empty when the graph has no steps, or when every step is the
    /// target of some edge (all steps on cycles) - the trigger for the
    /// no-start-steps failure at traversal time.
    pub fn start_steps(&self) -> Vec<&str> {
        let targets: HashSet<&str> = self
            .adjacency
            .values()
            .flatten()
            .map(|e| e.to.as_str())
            .collect();
        self.order
            .iter()
            .map(String::as_str)
            .filter(|id| !targets.contains(id))
            .collect()
    }

    /// Steps with zero out-degree, in insertion order.
    pub fn end_steps(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|id| self.adjacency.get(*id).map_or(true, Vec::is_empty))
            .collect()
    }

    /// Look up a step by id.
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.get(id)
    }

    /// Mutable step lookup, failing with [`FlowError::UnknownStep`].
    pub fn step_mut(&mut self, id: &str) -> Result<&mut Step> {
        self.steps
            .get_mut(id)
            .ok_or_else(|| FlowError::UnknownStep(id.to_string()))
    }

    /// All step ids in insertion order.
    pub fn step_ids(&self) -> &[StepId] {
        &self.order
    }

    /// Number of steps in the graph.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for WorkflowGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowGraph")
            .field("name", &self.name)
            .field("steps", &self.order)
            .field("adjacency", &self.adjacency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(ids: &[&str]) -> WorkflowGraph {
        let mut graph = WorkflowGraph::new("test");
        for id in ids {
            graph.add_step(Step::new(*id)).unwrap();
        }
        graph
    }

    #[test]
    fn test_duplicate_step_rejected() {
        let mut graph = graph_with(&["a"]);
        let err = graph.add_step(Step::new("a")).unwrap_err();
        assert!(matches!(err, FlowError::DuplicateStep(id) if id == "a"));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_connect_unknown_endpoint_rejected() {
        let mut graph = graph_with(&["a"]);
        assert!(matches!(
            graph.connect("a", "missing", None),
            Err(FlowError::UnknownStep(id)) if id == "missing"
        ));
        assert!(matches!(
            graph.connect("missing", "a", None),
            Err(FlowError::UnknownStep(_))
        ));
        assert!(graph.outgoing("a").is_empty());
    }

    #[test]
    fn test_reconnect_overwrites_condition() {
        let mut graph = graph_with(&["a", "b"]);
        graph.connect("a", "b", Some("x".into())).unwrap();
        graph.connect("a", "b", Some("y".into())).unwrap();

        let edges = graph.outgoing("a");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].condition.as_deref(), Some("y"));
    }

    #[test]
    fn test_start_and_end_steps() {
        let mut graph = graph_with(&["a", "b", "c", "d"]);
        graph.connect("a", "b", None).unwrap();
        graph.connect("a", "c", None).unwrap();
        graph.connect("b", "d", None).unwrap();
        graph.connect("c", "d", None).unwrap();

        assert_eq!(graph.start_steps(), vec!["a"]);
        assert_eq!(graph.end_steps(), vec!["d"]);
        assert_eq!(graph.successors("a"), vec!["b", "c"]);
        assert!(graph.successors("d").is_empty());
    }

    #[test]
    fn test_all_cycle_graph_has_no_start_steps() {
        let mut graph = graph_with(&["a", "b"]);
        graph.connect("a", "b", None).unwrap();
        graph.connect("b", "a", None).unwrap();

        assert!(graph.start_steps().is_empty());
        assert!(graph.end_steps().is_empty());
    }

    #[test]
    fn test_start_steps_follow_insertion_order() {
        let mut graph = graph_with(&["c", "a", "b"]);
        graph.connect("c", "b", None).unwrap();

        assert_eq!(graph.start_steps(), vec!["c", "a"]);
    }
}
