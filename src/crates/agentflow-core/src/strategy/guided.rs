//! Monte-Carlo guided search traversal.

use super::TraversalStrategy;
use crate::dispatch::dispatch;
use crate::error::{FlowError, Result};
use crate::graph::WorkflowGraph;
use crate::state::DataBag;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_ITERATIONS: usize = 100;
const DEFAULT_ROLLOUT_DEPTH: usize = 10;
const DEFAULT_EXPLORATION_WEIGHT: f64 = 1.0;

/// Monte-Carlo tree search over the workflow graph.
///
/// The strategy refines a search tree rooted at the first start step for
/// a fixed iteration budget (selection → expansion → simulation →
/// backpropagation), then executes the highest-average-value path found,
/// falling back to raw graph successors where the tree runs out. A
/// visited-set check caps the execution walk at one dispatch per step,
/// so cyclic graphs terminate.
///
/// The built-in reward is the inverse of the random-walk depth reached
/// during simulation - shorter completions score higher. It is a purely
/// structural heuristic and knows nothing about step semantics; supply a
/// domain reward via [`with_reward`](Self::with_reward) when search
/// quality matters, and tune
/// [`with_iterations`](Self::with_iterations),
/// [`with_rollout_depth`](Self::with_rollout_depth), and
/// [`with_exploration_weight`](Self::with_exploration_weight) to shape
/// the search.
pub struct GuidedSearch {
    iterations: usize,
    max_rollout_depth: usize,
    exploration_weight: f64,
    seed: Option<u64>,
    reward: RewardFn,
}

/// Scores one simulation: receives the step id the random walk ended on
/// and the depth it reached.
pub type RewardFn = Arc<dyn Fn(&str, usize) -> f64 + Send + Sync>;

fn default_reward(_final_step: &str, depth: usize) -> f64 {
    1.0 / (depth as f64 + 1.0)
}

impl GuidedSearch {
    /// Create a guided search with default budget (100 iterations,
    /// rollout depth 10, exploration weight 1.0, entropy-seeded RNG)
    /// and the depth-inverse reward.
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            max_rollout_depth: DEFAULT_ROLLOUT_DEPTH,
            exploration_weight: DEFAULT_EXPLORATION_WEIGHT,
            seed: None,
            reward: Arc::new(default_reward),
        }
    }

    /// Set the refinement iteration budget. Zero is valid: the root
    /// step still executes, the walk then falls back to raw graph
    /// successors.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Bound the random-walk depth of each simulation.
    pub fn with_rollout_depth(mut self, depth: usize) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Set the UCT exploration weight.
    pub fn with_exploration_weight(mut self, weight: f64) -> Self {
        self.exploration_weight = weight;
        self
    }

    /// Fix the RNG seed for reproducible searches.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the simulation reward with a domain-specific one.
    pub fn with_reward<F>(mut self, reward: F) -> Self
    where
        F: Fn(&str, usize) -> f64 + Send + Sync + 'static,
    {
        self.reward = Arc::new(reward);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Random walk over successor edges from `start`, bounded by the
    /// rollout depth, scored by the reward function. The default reward
    /// is `1 / (depth + 1)`: shallower completions score higher.
    fn simulate(&self, graph: &WorkflowGraph, start: &str, rng: &mut StdRng) -> f64 {
        let mut current = start.to_string();
        let mut depth = 0usize;
        while depth < self.max_rollout_depth {
            let successors = graph.successors(&current);
            if successors.is_empty() {
                break;
            }
            current = successors[rng.gen_range(0..successors.len())].to_string();
            depth += 1;
        }
        (self.reward)(&current, depth)
    }
}

impl Default for GuidedSearch {
    fn default() -> Self {
        Self::new()
    }
}

/// One node of the per-run search tree, stored in an index arena.
struct SearchNode {
    step_id: String,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Successor ids not yet expanded into children.
    untried: Vec<String>,
    visits: u64,
    value: f64,
}

struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    fn with_root(step_id: String, untried: Vec<String>) -> Self {
        Self {
            nodes: vec![SearchNode {
                step_id,
                parent: None,
                children: Vec::new(),
                untried,
                visits: 0,
                value: 0.0,
            }],
        }
    }

    fn add_child(&mut self, parent: usize, step_id: String, untried: Vec<String>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(SearchNode {
            step_id,
            parent: Some(parent),
            children: Vec::new(),
            untried,
            visits: 0,
            value: 0.0,
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Descend from `idx` while the node is fully expanded and has
    /// children, following the UCT-maximizing child.
    fn select(&self, mut idx: usize, exploration_weight: f64) -> usize {
        while self.nodes[idx].untried.is_empty() && !self.nodes[idx].children.is_empty() {
            idx = self.uct_child(idx, exploration_weight);
        }
        idx
    }

    /// Child maximizing `value/visits + c * sqrt(ln(parent_visits) / visits)`.
    /// An unvisited child scores infinity and is therefore tried first.
    fn uct_child(&self, idx: usize, exploration_weight: f64) -> usize {
        let parent_visits = self.nodes[idx].visits;
        let ln_parent = if parent_visits > 0 {
            (parent_visits as f64).ln()
        } else {
            0.0
        };

        let mut best = self.nodes[idx].children[0];
        let mut best_score = f64::NEG_INFINITY;
        for &child in &self.nodes[idx].children {
            let node = &self.nodes[child];
            let score = if node.visits == 0 {
                f64::INFINITY
            } else {
                let exploitation = node.value / node.visits as f64;
                let exploration =
                    exploration_weight * (ln_parent / node.visits as f64).sqrt();
                exploitation + exploration
            };
            if score > best_score {
                best_score = score;
                best = child;
            }
        }
        best
    }

    /// Child with the highest average value; unvisited children count
    /// as zero.
    fn best_child(&self, idx: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &child in &self.nodes[idx].children {
            let node = &self.nodes[child];
            let average = if node.visits > 0 {
                node.value / node.visits as f64
            } else {
                0.0
            };
            if best.map_or(true, |(_, score)| average > score) {
                best = Some((child, average));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Add the simulation reward to every node from `idx` up to the root.
    fn backpropagate(&mut self, idx: usize, reward: f64) {
        let mut current = Some(idx);
        while let Some(i) = current {
            self.nodes[i].visits += 1;
            self.nodes[i].value += reward;
            current = self.nodes[i].parent;
        }
    }
}

#[async_trait]
impl TraversalStrategy for GuidedSearch {
    fn name(&self) -> &'static str {
        "mcts"
    }

    async fn run(&self, graph: &mut WorkflowGraph, bag: &mut DataBag) -> Result<()> {
        let starts = graph.start_steps();
        let root_id = match starts.first() {
            Some(id) => id.to_string(),
            None => return Err(FlowError::no_start_steps(&graph.name)),
        };

        let root_untried: Vec<String> = graph
            .successors(&root_id)
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut tree = SearchTree::with_root(root_id, root_untried);
        let mut rng = self.rng();

        for _ in 0..self.iterations {
            // Selection
            let mut node = tree.select(0, self.exploration_weight);

            // Expansion
            if !tree.nodes[node].untried.is_empty() {
                let pick = rng.gen_range(0..tree.nodes[node].untried.len());
                let action = tree.nodes[node].untried.swap_remove(pick);
                let untried: Vec<String> = graph
                    .successors(&action)
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                node = tree.add_child(node, action, untried);
            }

            // Simulation + backpropagation
            let start = tree.nodes[node].step_id.clone();
            let reward = self.simulate(graph, &start, &mut rng);
            tree.backpropagate(node, reward);
        }

        debug!(
            workflow = %graph.name,
            tree_nodes = tree.nodes.len(),
            iterations = self.iterations,
            "search tree refined, executing best path"
        );

        // Execute the best path found. The visited-set check guarantees
        // at most one dispatch per step, which bounds the walk even on
        // cyclic graphs.
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = Some(0usize);
        while let Some(idx) = current {
            let id = tree.nodes[idx].step_id.clone();
            if !visited.insert(id.clone()) {
                break;
            }
            dispatch(graph.step_mut(&id)?, bag).await?;

            current = match tree.best_child(idx) {
                Some(child) => Some(child),
                None => {
                    // Tree ran out; synthesize a fresh, unexplored node
                    // for the graph's first successor, if any.
                    let next = graph.successors(&id).first().map(|s| s.to_string());
                    next.map(|next_id| tree.add_child(idx, next_id, Vec::new()))
                }
            };
        }

        debug!(executed = visited.len(), "guided search complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::bag_from;
    use crate::step::Step;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn logging_step(id: &str, log: Arc<Mutex<Vec<String>>>) -> Step {
        let id_owned = id.to_string();
        Step::new(id).with_behavior_fn(move |_| {
            log.lock().unwrap().push(id_owned.clone());
            Ok(Default::default())
        })
    }

    #[test]
    fn test_uct_tries_unvisited_children_first() {
        let mut tree = SearchTree::with_root("root".into(), Vec::new());
        let a = tree.add_child(0, "a".into(), Vec::new());
        let b = tree.add_child(0, "b".into(), Vec::new());

        tree.backpropagate(a, 0.9);
        assert_eq!(tree.uct_child(0, 1.0), b, "unvisited child wins selection");
    }

    #[test]
    fn test_backpropagate_updates_whole_path() {
        let mut tree = SearchTree::with_root("root".into(), Vec::new());
        let a = tree.add_child(0, "a".into(), Vec::new());
        let b = tree.add_child(a, "b".into(), Vec::new());

        tree.backpropagate(b, 0.5);
        tree.backpropagate(b, 0.25);

        assert_eq!(tree.nodes[0].visits, 2);
        assert_eq!(tree.nodes[a].visits, 2);
        assert_eq!(tree.nodes[b].visits, 2);
        assert!((tree.nodes[0].value - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_best_child_treats_unvisited_as_zero() {
        let mut tree = SearchTree::with_root("root".into(), Vec::new());
        let a = tree.add_child(0, "a".into(), Vec::new());
        let _b = tree.add_child(0, "b".into(), Vec::new());

        tree.nodes[a].visits = 2;
        tree.nodes[a].value = 0.5;

        assert_eq!(tree.best_child(0), Some(a));
    }

    #[tokio::test]
    async fn test_no_start_steps_fails() {
        let mut graph = WorkflowGraph::new("empty");
        let mut bag = DataBag::new();
        let err = GuidedSearch::new().run(&mut graph, &mut bag).await.unwrap_err();
        assert!(matches!(err, FlowError::NoStartSteps { .. }));
    }

    #[tokio::test]
    async fn test_zero_iterations_still_executes_root() {
        let mut graph = WorkflowGraph::new("zero-budget");
        graph
            .add_step(Step::new("root").with_behavior_fn(|_| Ok(bag_from([("ran", json!(true))]))))
            .unwrap();

        let mut bag = DataBag::new();
        GuidedSearch::new()
            .with_iterations(0)
            .run(&mut graph, &mut bag)
            .await
            .unwrap();

        assert_eq!(bag["ran"], json!(true));
    }

    #[tokio::test]
    async fn test_zero_iterations_walks_graph_via_fallback() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut graph = WorkflowGraph::new("chain");
        for id in ["a", "b", "c"] {
            graph.add_step(logging_step(id, log.clone())).unwrap();
        }
        graph.connect("a", "b", None).unwrap();
        graph.connect("b", "c", None).unwrap();

        let mut bag = DataBag::new();
        GuidedSearch::new()
            .with_iterations(0)
            .with_seed(7)
            .run(&mut graph, &mut bag)
            .await
            .unwrap();

        assert_eq!(log.lock().unwrap().clone(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_cycle_terminates_within_reachable_steps() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut graph = WorkflowGraph::new("cycle");
        for id in ["s", "a", "b"] {
            graph.add_step(logging_step(id, log.clone())).unwrap();
        }
        graph.connect("s", "a", None).unwrap();
        graph.connect("a", "b", None).unwrap();
        graph.connect("b", "a", None).unwrap();

        let mut bag = DataBag::new();
        GuidedSearch::new()
            .with_seed(11)
            .run(&mut graph, &mut bag)
            .await
            .unwrap();

        let order = log.lock().unwrap().clone();
        assert!(order.len() <= 3, "at most one dispatch per reachable step");
        let unique: HashSet<&String> = order.iter().collect();
        assert_eq!(unique.len(), order.len(), "no step dispatched twice");
        assert_eq!(order[0], "s");
    }

    #[tokio::test]
    async fn test_prefers_shorter_completion() {
        // From "root", the "done" branch terminates immediately
        // (simulated reward 1.0) while the "long" branch walks a chain
        // (reward 1/3). Both children are forcibly explored, so the
        // best-average child is always "done".
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut graph = WorkflowGraph::new("choice");
        for id in ["root", "done", "long", "longer", "longest"] {
            graph.add_step(logging_step(id, log.clone())).unwrap();
        }
        graph.connect("root", "done", None).unwrap();
        graph.connect("root", "long", None).unwrap();
        graph.connect("long", "longer", None).unwrap();
        graph.connect("longer", "longest", None).unwrap();

        let mut bag = DataBag::new();
        GuidedSearch::new()
            .with_seed(3)
            .run(&mut graph, &mut bag)
            .await
            .unwrap();

        let order = log.lock().unwrap().clone();
        assert_eq!(order, vec!["root", "done"]);
    }

    #[tokio::test]
    async fn test_custom_reward_inverts_the_preference() {
        // Same shape as the shorter-completion test, but the reward now
        // pays for depth, steering execution down the long branch.
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut graph = WorkflowGraph::new("choice");
        for id in ["root", "done", "long", "longer", "longest"] {
            graph.add_step(logging_step(id, log.clone())).unwrap();
        }
        graph.connect("root", "done", None).unwrap();
        graph.connect("root", "long", None).unwrap();
        graph.connect("long", "longer", None).unwrap();
        graph.connect("longer", "longest", None).unwrap();

        let mut bag = DataBag::new();
        GuidedSearch::new()
            .with_seed(3)
            .with_reward(|_, depth| depth as f64)
            .run(&mut graph, &mut bag)
            .await
            .unwrap();

        let order = log.lock().unwrap().clone();
        assert_eq!(order, vec!["root", "long", "longer", "longest"]);
    }
}
