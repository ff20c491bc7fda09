// ruleflow/examples/error_handling.rs

use ruleflow::{
  executor_fn, ActionNode, ContextData, Edge, FlowError, Node, Operation, RenderedTemplates, RunOptions, Workflow,
};
use serde_json::{json, Value};
use tracing::{error, info};

fn single_action(operation_type: &str, template: &str) -> Workflow {
  Workflow::new(
    "start",
    vec![
      Node::start("start"),
      ActionNode::new("act", Operation::new(operation_type))
        .with_template("body", template)
        .into(),
    ],
    vec![Edge::new("start", "act")],
  )
}

fn flaky_options() -> RunOptions {
  RunOptions::new().with_executor(
    "flaky",
    executor_fn(|_op: Operation, _templates: RenderedTemplates, ctx: ContextData| {
      Box::pin(async move {
        if ctx.get("fail").and_then(|v| v.as_bool()).unwrap_or(false) {
          anyhow::bail!("Downstream service unavailable");
        }
        Ok::<_, anyhow::Error>(Value::from("ok"))
      })
    }),
  )
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Error Handling Example ---");

  // Scenario 1: the traversal reaches a node id that does not exist. Recovered: the run returns
  // normally and the log carries an `error` entry.
  let dangling = Workflow::new("start", vec![Node::start("start")], vec![Edge::new("start", "ghost")]);
  match ruleflow::run(&dangling, &json!({}), RunOptions::new()).await {
    Ok(outcome) => info!("Dangling edge: run completed, has_errors = {}", outcome.has_errors()),
    Err(e) => error!("Unexpected failure: {}", e),
  }

  // Scenario 2: no executor registered for the operation type. Fatal.
  match ruleflow::run(&single_action("email", "hi"), &json!({}), RunOptions::new()).await {
    Err(e @ FlowError::ExecutorNotFound { .. }) => info!("Expected failure: {}", e),
    other => error!("Unexpected result: {:?}", other.map(|o| o.data)),
  }

  // Scenario 3: the executor itself fails. Fatal, with the executor's error as the source.
  match ruleflow::run(&single_action("flaky", "hi"), &json!({ "fail": true }), flaky_options()).await {
    Err(e @ FlowError::ExecutorFailure { .. }) => info!("Expected failure: {}", e),
    other => error!("Unexpected result: {:?}", other.map(|o| o.data)),
  }

  // Scenario 4: a template does not parse. Fatal.
  match ruleflow::run(&single_action("flaky", "{{ unclosed"), &json!({}), flaky_options()).await {
    Err(e @ FlowError::TemplateRender { .. }) => info!("Expected failure: {}", e),
    other => error!("Unexpected result: {:?}", other.map(|o| o.data)),
  }

  // Scenario 5: invalid engine configuration is rejected before any run.
  let duplicated = flaky_options().with_executor(
    "flaky",
    executor_fn(|_op: Operation, _t: RenderedTemplates, _c: ContextData| {
      Box::pin(async { Ok::<_, anyhow::Error>(Value::Null) })
    }),
  );
  if let Err(e) = ruleflow::Engine::new(duplicated) {
    info!("Expected configuration failure: {}", e);
  }

  info!("--- Error Handling Example Finished ---");
}
