// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use once_cell::sync::Lazy;
use ruleflow::{
  executor_fn, ActionNode, ContextData, Edge, LogStep, Node, Operation, RenderedTemplates, RunOptions, RunOutcome,
  Workflow,
};
use serde_json::{json, Value};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing_subscriber::EnvFilter;

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ruleflow=debug")))
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static EXECUTOR_CALLS: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));
pub static OPERATOR_CALLS: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  EXECUTOR_CALLS.store(0, Ordering::SeqCst);
  OPERATOR_CALLS.store(0, Ordering::SeqCst);
}

// --- Common Executors ---

/// Counts its calls and returns `result` unchanged.
pub fn returning_executor(result: Value) -> RunOptions {
  RunOptions::new().with_executor(
    "log",
    executor_fn(move |_op: Operation, _templates: RenderedTemplates, _ctx: ContextData| {
      let result = result.clone();
      Box::pin(async move {
        EXECUTOR_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok::<_, anyhow::Error>(result)
      })
    }),
  )
}

/// Echoes the rendered templates back as its result.
pub fn echo_options() -> RunOptions {
  RunOptions::new().with_executor(
    "echo",
    executor_fn(|_op: Operation, templates: RenderedTemplates, _ctx: ContextData| {
      Box::pin(async move {
        EXECUTOR_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok::<_, anyhow::Error>(Value::Object(templates))
      })
    }),
  )
}

// --- Common Workflows ---

/// `start -> action1 (log, msg = "Hello {{name}}") -> end`
pub fn hello_workflow() -> Workflow {
  Workflow::new(
    "start",
    vec![
      Node::start("start"),
      ActionNode::new("action1", Operation::new("log"))
        .with_template("msg", "Hello {{name}}")
        .into(),
      Node::end("end"),
    ],
    vec![Edge::new("start", "action1"), Edge::new("action1", "end")],
  )
}

pub fn empty_context() -> Value {
  json!({})
}

// --- Log helpers ---

pub fn steps(outcome: &RunOutcome) -> Vec<LogStep> {
  outcome.logs.iter().map(|entry| entry.step()).collect()
}

pub fn steps_with_nodes(outcome: &RunOutcome) -> Vec<(LogStep, Option<String>)> {
  outcome.logs.iter().map(|entry| (entry.step(), entry.node.clone())).collect()
}

/// Ids of entered nodes, in order.
pub fn entered(outcome: &RunOutcome) -> Vec<String> {
  outcome
    .logs
    .iter()
    .filter(|entry| entry.step() == LogStep::NodeEnter)
    .filter_map(|entry| entry.node.clone())
    .collect()
}
