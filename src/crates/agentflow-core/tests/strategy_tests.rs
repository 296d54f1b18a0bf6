//! End-to-end tests running whole workflows through the registry.

use agentflow_core::state::{bag_from, DataBag};
use agentflow_core::{
    BreadthFirst, DepthFirst, FlowError, GuidedSearch, Step, StrategyRegistry,
    TraversalStrategy, WorkflowGraph,
};
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn logging_step(id: &str, log: Arc<Mutex<Vec<String>>>) -> Step {
    let id_owned = id.to_string();
    Step::new(id).with_behavior_fn(move |_| {
        log.lock().unwrap().push(id_owned.clone());
        Ok(DataBag::new())
    })
}

/// a → {b, c} → d, with behaviors passing data through the bag.
fn pipeline_graph() -> WorkflowGraph {
    let mut graph = WorkflowGraph::new("pipeline");
    graph
        .add_step(
            Step::new("fetch")
                .with_input("topic", json!(null))
                .with_behavior_fn(|inputs| {
                    let topic = inputs["topic"].as_str().unwrap_or("unknown");
                    Ok(bag_from([("raw", json!(format!("notes on {topic}")))]))
                }),
        )
        .unwrap();
    graph
        .add_step(
            Step::new("summarize")
                .with_input("raw", json!(null))
                .with_behavior_fn(|inputs| {
                    let raw = inputs["raw"].as_str().unwrap_or_default();
                    Ok(bag_from([("summary", json!(raw.len()))]))
                }),
        )
        .unwrap();
    graph.connect("fetch", "summarize", None).unwrap();
    graph
}

#[tokio::test]
async fn test_registry_executes_pipeline_with_dfs() {
    let mut graph = pipeline_graph();
    let registry = StrategyRegistry::with_defaults();

    let mut bag = bag_from([("topic", json!("rust"))]);
    registry.execute(&mut graph, "dfs", &mut bag).await.unwrap();

    assert_eq!(bag["raw"], json!("notes on rust"));
    assert_eq!(bag["summary"], json!("notes on rust".len()));
}

#[tokio::test]
async fn test_unknown_strategy_leaves_everything_untouched() {
    let mut graph = pipeline_graph();
    let registry = StrategyRegistry::with_defaults();

    let mut bag = bag_from([("topic", json!("rust"))]);
    let err = registry
        .execute(&mut graph, "a-star", &mut bag)
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::StrategyNotFound(name) if name == "a-star"));
    assert_eq!(bag.len(), 1, "no step ran");
    assert!(graph.step("fetch").unwrap().outputs.is_empty());
}

#[tokio::test]
async fn test_diamond_under_dfs_and_bfs_visits_each_step_once() {
    for strategy in ["dfs", "bfs"] {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut graph = WorkflowGraph::new("diamond");
        for id in ["a", "b", "c", "d"] {
            graph.add_step(logging_step(id, log.clone())).unwrap();
        }
        graph.connect("a", "b", None).unwrap();
        graph.connect("a", "c", None).unwrap();
        graph.connect("b", "d", None).unwrap();
        graph.connect("c", "d", None).unwrap();

        let registry = StrategyRegistry::with_defaults();
        let mut bag = DataBag::new();
        registry
            .execute(&mut graph, strategy, &mut bag)
            .await
            .unwrap();

        let order = log.lock().unwrap().clone();
        assert_eq!(order.len(), 4, "{strategy}: each step exactly once");
        assert_eq!(order[0], "a", "{strategy}: starts at the start step");
    }
}

#[tokio::test]
async fn test_cyclic_graph_terminates_under_every_default_strategy() {
    for strategy in ["dfs", "bfs", "mcts"] {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut graph = WorkflowGraph::new("cyclic");
        for id in ["entry", "a", "b"] {
            graph.add_step(logging_step(id, log.clone())).unwrap();
        }
        graph.connect("entry", "a", None).unwrap();
        graph.connect("a", "b", None).unwrap();
        graph.connect("b", "a", None).unwrap();

        let registry = StrategyRegistry::with_defaults();
        let mut bag = DataBag::new();
        registry
            .execute(&mut graph, strategy, &mut bag)
            .await
            .unwrap();

        let order = log.lock().unwrap().clone();
        assert!(
            order.len() <= 3,
            "{strategy}: dispatches bounded by reachable steps"
        );
        let unique: HashSet<&String> = order.iter().collect();
        assert_eq!(unique.len(), order.len(), "{strategy}: no repeats");
    }
}

#[tokio::test]
async fn test_guided_search_with_zero_iterations_dispatches_root() {
    let mut graph = pipeline_graph();
    let strategy = GuidedSearch::new().with_iterations(0).with_seed(1);

    let mut bag = bag_from([("topic", json!("graphs"))]);
    strategy.run(&mut graph, &mut bag).await.unwrap();

    assert_eq!(bag["raw"], json!("notes on graphs"));
    // The fallback walk continues past the root through graph successors.
    assert_eq!(bag["summary"], json!("notes on graphs".len()));
}

#[tokio::test]
async fn test_custom_strategy_can_replace_a_builtin() {
    /// Visits only start steps, nothing downstream.
    struct StartsOnly;

    #[async_trait::async_trait]
    impl TraversalStrategy for StartsOnly {
        fn name(&self) -> &'static str {
            "dfs"
        }

        async fn run(
            &self,
            graph: &mut WorkflowGraph,
            bag: &mut DataBag,
        ) -> agentflow_core::Result<()> {
            let starts: Vec<String> =
                graph.start_steps().iter().map(|s| s.to_string()).collect();
            for id in starts {
                agentflow_core::dispatch(graph.step_mut(&id)?, bag).await?;
            }
            Ok(())
        }
    }

    let mut registry = StrategyRegistry::with_defaults();
    registry.register(Arc::new(StartsOnly));

    let mut graph = pipeline_graph();
    let mut bag = bag_from([("topic", json!("rust"))]);
    registry.execute(&mut graph, "dfs", &mut bag).await.unwrap();

    assert_eq!(bag["raw"], json!("notes on rust"));
    assert!(bag.get("summary").is_none(), "downstream step skipped");
}

#[tokio::test]
async fn test_behavior_failure_surfaces_with_step_context() {
    let mut graph = WorkflowGraph::new("failing");
    graph
        .add_step(Step::new("boom").with_behavior_fn(|_| Err("disk on fire".into())))
        .unwrap();

    let registry = StrategyRegistry::with_defaults();
    let mut bag = DataBag::new();
    let err = registry
        .execute(&mut graph, "dfs", &mut bag)
        .await
        .unwrap_err();

    match err {
        FlowError::Behavior { step, error } => {
            assert_eq!(step, "boom");
            assert!(error.contains("disk on fire"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

proptest! {
    /// On an arbitrary DAG (edges only from lower to higher index, so no
    /// cycles), depth-first dispatch runs every step reachable from a
    /// start step exactly once.
    #[test]
    fn prop_dfs_dispatches_reachable_steps_exactly_once(
        n in 1usize..8,
        edge_bits in proptest::collection::vec(any::<bool>(), 28),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(async {
            let ids: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
            let log = Arc::new(Mutex::new(Vec::new()));
            let mut graph = WorkflowGraph::new("random-dag");
            for id in &ids {
                graph.add_step(logging_step(id, log.clone())).unwrap();
            }

            let mut bit = edge_bits.iter().copied();
            for i in 0..n {
                for j in (i + 1)..n {
                    if bit.next().unwrap_or(false) {
                        graph.connect(&ids[i], &ids[j], None).unwrap();
                    }
                }
            }

            // Reachability from the zero-in-degree steps.
            let mut reachable: HashSet<String> = HashSet::new();
            let mut frontier: Vec<String> =
                graph.start_steps().iter().map(|s| s.to_string()).collect();
            while let Some(id) = frontier.pop() {
                if reachable.insert(id.clone()) {
                    frontier.extend(graph.successors(&id).iter().map(|s| s.to_string()));
                }
            }

            let mut bag = DataBag::new();
            DepthFirst.run(&mut graph, &mut bag).await.unwrap();

            let order = log.lock().unwrap().clone();
            let dispatched: HashSet<String> = order.iter().cloned().collect();
            prop_assert_eq!(order.len(), dispatched.len());
            prop_assert_eq!(dispatched, reachable);
            Ok(())
        })?;
    }

    /// Breadth-first never mutates the caller's bag, whatever the graph.
    #[test]
    fn prop_bfs_preserves_caller_bag(n in 1usize..6) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(async {
            let mut graph = WorkflowGraph::new("chain");
            let ids: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
            for id in &ids {
                let key = id.clone();
                graph
                    .add_step(Step::new(id).with_behavior_fn(move |_| {
                        Ok(bag_from([(key.as_str(), json!(1))]))
                    }))
                    .unwrap();
            }
            for pair in ids.windows(2) {
                graph.connect(&pair[0], &pair[1], None).unwrap();
            }

            let mut bag = bag_from([("seed", json!("untouched"))]);
            let before = bag.clone();
            BreadthFirst.run(&mut graph, &mut bag).await.unwrap();
            prop_assert_eq!(bag, before);
            Ok(())
        })?;
    }
}
