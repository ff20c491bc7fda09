// ruleflow/examples/branching_workflow.rs

use ruleflow::{executor_fn, ContextData, Engine, Operation, RenderedTemplates, RunOptions, Workflow};
use serde_json::json;
use tracing::{info, warn};

const DEFINITION: &str = r#"{
  "initialNodeId": "start",
  "nodes": [
    { "id": "start", "type": "start" },
    {
      "id": "is_priority",
      "type": "condition",
      "conditions": [
        { "type": "or", "conditions": [
          { "field": "order.total", "operator": "gte", "value": 500 },
          { "field": "customer.tier", "operator": "in", "value": ["gold", "platinum"] }
        ] }
      ]
    },
    {
      "id": "fast_track",
      "type": "action",
      "templates": { "note": "Priority order {{ order.id }} for {{ customer.name }}" },
      "operation": { "type": "notify", "channel": "ops" }
    },
    {
      "id": "standard",
      "type": "action",
      "delay": 50,
      "templates": { "note": "Queued order {{ order.id }}" },
      "operation": { "type": "notify", "channel": "queue" }
    },
    { "id": "end", "type": "end" }
  ],
  "edges": [
    { "source": "start", "target": "is_priority" },
    { "source": "is_priority", "target": "fast_track", "condition": "passed" },
    { "source": "is_priority", "target": "standard", "condition": "failed" },
    { "source": "fast_track", "target": "end" },
    { "source": "standard", "target": "end" }
  ]
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Branching Workflow Example ---");

  let workflow = Workflow::from_json(DEFINITION)?;
  for issue in workflow.validate() {
    warn!("Definition issue: {}", issue);
  }

  let engine = Engine::new(RunOptions::new().with_executor(
    "notify",
    executor_fn(|op: Operation, templates: RenderedTemplates, _ctx: ContextData| {
      Box::pin(async move {
        let channel = op.field("channel").cloned().unwrap_or(json!("default"));
        info!(%channel, "Notify: {}", templates.get("note").and_then(|v| v.as_str()).unwrap_or_default());
        Ok::<_, anyhow::Error>(json!({ "channel": channel }))
      })
    }),
  ))?;

  let orders = [
    json!({ "order": { "id": "A-1", "total": 900 }, "customer": { "name": "Kim", "tier": "silver" } }),
    json!({ "order": { "id": "B-2", "total": 40 }, "customer": { "name": "Lee", "tier": "gold" } }),
    json!({ "order": { "id": "C-3", "total": 40 }, "customer": { "name": "Max", "tier": "bronze" } }),
  ];

  // One engine, several concurrent runs.
  let runs = orders.iter().map(|order| engine.run(&workflow, order));
  for (order, outcome) in orders.iter().zip(futures::future::join_all(runs).await) {
    let outcome = outcome?;
    let path: Vec<&str> = outcome
      .logs
      .iter()
      .filter(|entry| entry.step() == ruleflow::LogStep::NodeEnter)
      .filter_map(|entry| entry.node.as_deref())
      .collect();
    info!("Order {} visited {:?}", order["order"]["id"], path);
  }

  info!("--- Branching Workflow Example Finished ---");
  Ok(())
}
