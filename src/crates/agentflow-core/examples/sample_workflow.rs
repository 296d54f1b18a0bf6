//! A small research workflow run under each built-in strategy.
//!
//! ```sh
//! cargo run -p agentflow-core --example sample_workflow
//! ```

use agentflow_core::state::bag_from;
use agentflow_core::{Step, StrategyRegistry, WorkflowGraph};
use serde_json::json;

fn research_workflow() -> anyhow::Result<WorkflowGraph> {
    let mut graph = WorkflowGraph::new("research")
        .with_description("gather notes on a topic, then summarize and critique them");

    graph.add_step(
        Step::new("gather")
            .with_input("topic", json!(null))
            .with_behavior_fn(|inputs| {
                let topic = inputs["topic"].as_str().unwrap_or("nothing in particular");
                Ok(bag_from([(
                    "notes",
                    json!(format!("three observations about {topic}")),
                )]))
            }),
    )?;

    graph.add_step(
        Step::new("summarize")
            .with_input("notes", json!(null))
            .with_behavior_fn(|inputs| {
                let notes = inputs["notes"].as_str().unwrap_or_default();
                Ok(bag_from([(
                    "summary",
                    json!(format!("summary ({} chars of notes)", notes.len())),
                )]))
            }),
    )?;

    graph.add_step(
        Step::new("critique")
            .with_input("summary", json!(null))
            .with_behavior_fn(|inputs| {
                let ok = inputs["summary"].as_str().map_or(false, |s| !s.is_empty());
                Ok(bag_from([("approved", json!(ok))]))
            }),
    )?;

    graph.connect("gather", "summarize", None)?;
    graph.connect("summarize", "critique", None)?;
    Ok(graph)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let registry = StrategyRegistry::with_defaults();

    for strategy in ["dfs", "bfs", "mcts"] {
        let mut graph = research_workflow()?;
        let mut bag = bag_from([("topic", json!("workflow engines"))]);

        registry.execute(&mut graph, strategy, &mut bag).await?;

        println!("--- {strategy} ---");
        println!("bag after run: {}", serde_json::to_string_pretty(&bag)?);
        for id in graph.step_ids() {
            if let Some(step) = graph.step(id) {
                println!("  {id}: outputs = {}", json!(step.outputs));
            }
        }
    }

    Ok(())
}
