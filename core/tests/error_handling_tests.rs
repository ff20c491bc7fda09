// tests/error_handling_tests.rs
mod common;

use common::*;
use ruleflow::{
  executor_fn, operator_fn, ActionNode, Condition, ContextData, Edge, Engine, FlowError, Node, Operation,
  RenderedTemplates, RunOptions, Workflow,
};
use serde_json::{json, Value};
use std::error::Error as StdError;

fn failing_options(message: &'static str) -> RunOptions {
  RunOptions::new().with_executor(
    "log",
    executor_fn(move |_op: Operation, _templates: RenderedTemplates, _ctx: ContextData| {
      Box::pin(async move { Err::<Value, _>(anyhow::anyhow!(message)) })
    }),
  )
}

#[tokio::test]
async fn test_unknown_executor_fails_the_run() {
  setup_tracing();
  let result = ruleflow::run(&hello_workflow(), &json!({ "name": "Alice" }), RunOptions::new()).await;

  match result {
    Err(FlowError::ExecutorNotFound { node_id, operation_type }) => {
      assert_eq!(node_id, "action1");
      assert_eq!(operation_type, "log");
    }
    other => panic!("Expected ExecutorNotFound, got {:?}", other),
  }
}

#[tokio::test]
async fn test_gated_action_with_unknown_executor_does_not_fail() {
  let workflow = Workflow::new(
    "act",
    vec![ActionNode::new("act", Operation::new("missing"))
      .with_conditions(vec![Condition::leaf("go", "eq", json!(true))])
      .into()],
    vec![],
  );

  let outcome = ruleflow::run(&workflow, &json!({ "go": false }), RunOptions::new()).await;
  assert!(outcome.is_ok());
}

#[tokio::test]
async fn test_executor_failure_propagates_with_source() {
  let result = ruleflow::run(&hello_workflow(), &empty_context(), failing_options("disk full")).await;

  match result {
    Err(err @ FlowError::ExecutorFailure { .. }) => {
      assert!(err.to_string().contains("action1"));
      let source = err.source().expect("executor error is the source");
      assert_eq!(source.to_string(), "disk full");
    }
    other => panic!("Expected ExecutorFailure, got {:?}", other),
  }
}

#[tokio::test]
async fn test_malformed_template_fails_the_run() {
  let workflow = Workflow::new(
    "act",
    vec![ActionNode::new("act", Operation::new("log"))
      .with_template("broken", "Hello {{ name")
      .into()],
    vec![],
  );

  let result = ruleflow::run(&workflow, &json!({ "name": "Al" }), returning_executor(json!(null))).await;

  match result {
    Err(FlowError::TemplateRender { node_id, template, .. }) => {
      assert_eq!(node_id, "act");
      assert_eq!(template, "broken");
    }
    other => panic!("Expected TemplateRender, got {:?}", other),
  }
}

#[tokio::test]
async fn test_malformed_transformation_fails_before_executor() {
  let workflow = Workflow::new(
    "act",
    vec![ActionNode::new("act", Operation::new("log"))
      .with_transformation("target", "{% if %}")
      .into()],
    vec![],
  );

  let result = ruleflow::run(&workflow, &empty_context(), failing_options("must not run")).await;

  match result {
    Err(FlowError::TemplateRender { template, .. }) => assert_eq!(template, "target"),
    other => panic!("Expected TemplateRender, got {:?}", other),
  }
}

#[tokio::test]
async fn test_transformation_with_out_of_range_index_fails_the_run() {
  let workflow = Workflow::new(
    "act",
    vec![ActionNode::new("act", Operation::new("log"))
      .with_transformation("items.18446744073709551615", "x")
      .into()],
    vec![],
  );

  let result = ruleflow::run(&workflow, &json!({ "items": [] }), failing_options("must not run")).await;

  match result {
    Err(FlowError::InvalidPath { path, .. }) => assert_eq!(path, "items.18446744073709551615"),
    other => panic!("Expected InvalidPath, got {:?}", other),
  }
}

#[tokio::test]
async fn test_unrecognized_node_fails_only_when_reached() {
  let reached = Workflow::new(
    "start",
    vec![
      Node::start("start"),
      Node::Unrecognized {
        id: "odd".to_string(),
        node_type: "webhook".to_string(),
      },
    ],
    vec![Edge::new("start", "odd")],
  );
  match ruleflow::run(&reached, &empty_context(), RunOptions::new()).await {
    Err(FlowError::UnrecognizedNodeType { node_id, node_type }) => {
      assert_eq!(node_id, "odd");
      assert_eq!(node_type, "webhook");
    }
    other => panic!("Expected UnrecognizedNodeType, got {:?}", other),
  }

  let unreached = Workflow::new("start", reached.nodes.clone(), vec![]);
  assert!(ruleflow::run(&unreached, &empty_context(), RunOptions::new()).await.is_ok());
}

#[tokio::test]
async fn test_failed_run_keeps_earlier_effects_out_of_the_input() {
  let workflow = Workflow::new(
    "shape",
    vec![ActionNode::new("shape", Operation::new("log"))
      .with_transformation("touched", "yes")
      .into()],
    vec![],
  );
  let initial = json!({ "touched": "no" });

  let result = ruleflow::run(&workflow, &initial, failing_options("late failure")).await;

  assert!(matches!(result, Err(FlowError::ExecutorFailure { .. })));
  assert_eq!(initial, json!({ "touched": "no" }));
}

#[test]
fn test_empty_executor_name_is_rejected() {
  let options = returning_executor(json!(null)).with_executor(
    "  ",
    executor_fn(|_op: Operation, _t: RenderedTemplates, _c: ContextData| {
      Box::pin(async { Ok::<_, anyhow::Error>(Value::Null) })
    }),
  );

  match Engine::new(options) {
    Err(FlowError::Registration { kind, .. }) => assert_eq!(kind, "executor"),
    other => panic!("Expected Registration error, got {:?}", other),
  }
}

#[test]
fn test_duplicate_executor_name_is_rejected() {
  let options = returning_executor(json!(1)).with_executor(
    "log",
    executor_fn(|_op: Operation, _t: RenderedTemplates, _c: ContextData| {
      Box::pin(async { Ok::<_, anyhow::Error>(Value::Null) })
    }),
  );

  match Engine::new(options) {
    Err(FlowError::Registration { kind, name, .. }) => {
      assert_eq!(kind, "executor");
      assert_eq!(name, "log");
    }
    other => panic!("Expected Registration error, got {:?}", other),
  }
}

#[test]
fn test_duplicate_custom_operator_is_rejected_but_builtin_override_is_not() {
  let always = |_: Option<&Value>, _: Option<&Value>| true;

  let overriding = RunOptions::new().with_operator("eq", operator_fn(always));
  assert!(Engine::new(overriding).is_ok());

  let duplicated = RunOptions::new()
    .with_operator("custom", operator_fn(always))
    .with_operator("custom", operator_fn(always));
  match Engine::new(duplicated) {
    Err(FlowError::Registration { kind, name, .. }) => {
      assert_eq!(kind, "operator");
      assert_eq!(name, "custom");
    }
    other => panic!("Expected Registration error, got {:?}", other),
  }

  let empty = RunOptions::new().with_operator("", operator_fn(always));
  assert!(matches!(Engine::new(empty), Err(FlowError::Registration { .. })));
}

#[test]
fn test_invalid_workflow_json_is_a_deserialization_error() {
  let err = Workflow::from_json(r#"{ "nodes": [] }"#).unwrap_err();
  assert!(matches!(err, FlowError::Deserialization { .. }));

  let err = Workflow::from_json(r#"{ "initialNodeId": "a", "nodes": [{ "id": "a", "type": "action" }] }"#).unwrap_err();
  assert!(err.to_string().contains("Invalid workflow definition"));
}
