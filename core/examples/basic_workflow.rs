// ruleflow/examples/basic_workflow.rs

use ruleflow::{executor_fn, ActionNode, ContextData, Edge, FlowError, Node, Operation, RenderedTemplates, RunOptions, Workflow};
use serde_json::json;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), FlowError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Workflow Example ---");

  // 1. Describe the graph: start -> greet -> end
  let workflow = Workflow::new(
    "start",
    vec![
      Node::start("start"),
      ActionNode::new("greet", Operation::new("log").with_field("level", json!("info")))
        .with_transformation("user.display", "{{ user.first }} {{ user.last }}")
        .with_template("msg", "Hello {{ user.display }}!")
        .into(),
      Node::end("end"),
    ],
    vec![Edge::new("start", "greet"), Edge::new("greet", "end")],
  );

  // 2. Provide an executor for the "log" operation type
  let options = RunOptions::new().with_executor(
    "log",
    executor_fn(|op: Operation, templates: RenderedTemplates, _ctx: ContextData| {
      Box::pin(async move {
        let severity = op.field("level").and_then(|v| v.as_str()).unwrap_or("info");
        let msg = templates.get("msg").and_then(|v| v.as_str()).unwrap_or_default();
        info!(severity, "Executor says: {}", msg);
        Ok::<_, anyhow::Error>(json!({ "logged": true }))
      })
    }),
  );

  // 3. Run it
  let initial = json!({ "user": { "first": "Ada", "last": "Lovelace" } });
  let outcome = ruleflow::run(&workflow, &initial, options).await?;

  // 4. Inspect the results
  info!("Final context: {}", outcome.data);
  for entry in &outcome.logs {
    info!(
      "{} {:?} node={}",
      entry.timestamp.to_rfc3339(),
      entry.step(),
      entry.node.as_deref().unwrap_or("-")
    );
  }

  assert_eq!(outcome.data["__templates"]["greet"]["msg"], json!("Hello Ada Lovelace!"));
  info!("--- Basic Workflow Example Finished ---");
  Ok(())
}
