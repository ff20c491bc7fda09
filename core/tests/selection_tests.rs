// tests/selection_tests.rs
mod common;

use common::*;
use ruleflow::{BranchOutcome, Condition, ContextData, Edge, Engine, Graph, Node, RunOptions, Workflow};
use serde_json::json;

fn engine() -> Engine {
  Engine::new(RunOptions::new()).unwrap()
}

fn workflow_with_edges(edges: Vec<Edge>) -> Workflow {
  Workflow::new(
    "from",
    vec![Node::start("from"), Node::end("a"), Node::end("b"), Node::end("c")],
    edges,
  )
}

#[tokio::test]
async fn test_first_unguarded_edge_wins() {
  setup_tracing();
  let engine = engine();
  let workflow = workflow_with_edges(vec![Edge::new("from", "a"), Edge::new("from", "b")]);
  let graph = Graph::new(&workflow);

  let next = engine.select_next(&graph, &ContextData::default(), "from", None).await;
  assert_eq!(next.as_deref(), Some("a"));
}

#[tokio::test]
async fn test_no_outgoing_edges_ends_traversal() {
  let engine = engine();
  let workflow = workflow_with_edges(vec![Edge::new("a", "b")]);
  let graph = Graph::new(&workflow);

  assert_eq!(engine.select_next(&graph, &ContextData::default(), "from", None).await, None);
}

#[tokio::test]
async fn test_outcome_filters_tagged_edges() {
  let engine = engine();
  let workflow = workflow_with_edges(vec![
    Edge::new("from", "a").tagged("passed"),
    Edge::new("from", "b").tagged("failed"),
  ]);
  let graph = Graph::new(&workflow);
  let ctx = ContextData::default();

  let passed = engine.select_next(&graph, &ctx, "from", Some(BranchOutcome::Passed)).await;
  let failed = engine.select_next(&graph, &ctx, "from", Some(BranchOutcome::Failed)).await;
  assert_eq!(passed.as_deref(), Some("a"));
  assert_eq!(failed.as_deref(), Some("b"));
}

#[tokio::test]
async fn test_untagged_edges_match_any_outcome() {
  let engine = engine();
  let workflow = workflow_with_edges(vec![
    Edge::new("from", "a").tagged("passed"),
    Edge::new("from", "c"),
  ]);
  let graph = Graph::new(&workflow);

  let next = engine
    .select_next(&graph, &ContextData::default(), "from", Some(BranchOutcome::Failed))
    .await;
  assert_eq!(next.as_deref(), Some("c"));
}

#[tokio::test]
async fn test_tagged_edges_are_skipped_without_outcome() {
  let engine = engine();
  let workflow = workflow_with_edges(vec![Edge::new("from", "a").tagged("passed")]);
  let graph = Graph::new(&workflow);

  assert_eq!(engine.select_next(&graph, &ContextData::default(), "from", None).await, None);
}

#[tokio::test]
async fn test_guard_picks_first_holding_edge() {
  let engine = engine();
  let workflow = workflow_with_edges(vec![
    Edge::new("from", "a").guarded_by(vec![Condition::leaf("tier", "eq", json!("gold"))]),
    Edge::new("from", "b").guarded_by(vec![Condition::leaf("tier", "eq", json!("silver"))]),
  ]);
  let graph = Graph::new(&workflow);
  let ctx = ContextData::new(json!({ "tier": "silver" }));

  let next = engine.select_next(&graph, &ctx, "from", None).await;
  assert_eq!(next.as_deref(), Some("b"));
}

#[tokio::test]
async fn test_falls_back_to_first_candidate_when_no_guard_holds() {
  let engine = engine();
  let workflow = workflow_with_edges(vec![
    Edge::new("from", "a").guarded_by(vec![Condition::leaf("tier", "eq", json!("gold"))]),
    Edge::new("from", "b").guarded_by(vec![Condition::leaf("tier", "eq", json!("silver"))]),
  ]);
  let graph = Graph::new(&workflow);
  let ctx = ContextData::new(json!({ "tier": "bronze" }));

  let next = engine.select_next(&graph, &ctx, "from", None).await;
  assert_eq!(next.as_deref(), Some("a"));
}

#[tokio::test]
async fn test_single_guarded_edge_is_taken_even_when_guard_fails() {
  let engine = engine();
  let workflow = workflow_with_edges(vec![
    Edge::new("from", "c").guarded_by(vec![Condition::leaf("ready", "true", json!(null))]),
  ]);
  let graph = Graph::new(&workflow);
  let ctx = ContextData::new(json!({ "ready": false }));

  let next = engine.select_next(&graph, &ctx, "from", None).await;
  assert_eq!(next.as_deref(), Some("c"));
}

#[tokio::test]
async fn test_empty_guard_list_always_holds() {
  let engine = engine();
  let workflow = workflow_with_edges(vec![
    Edge::new("from", "a").guarded_by(vec![Condition::leaf("missing", "defined", json!(null))]),
    Edge::new("from", "b").guarded_by(vec![]),
  ]);
  let graph = Graph::new(&workflow);

  let next = engine.select_next(&graph, &ContextData::default(), "from", None).await;
  assert_eq!(next.as_deref(), Some("b"));
}

#[test]
fn test_graph_lookup_and_edge_order() {
  let workflow = workflow_with_edges(vec![
    Edge::new("from", "b"),
    Edge::new("a", "c"),
    Edge::new("from", "a"),
  ]);
  let graph = Graph::new(&workflow);

  assert_eq!(graph.find_node("a").map(Node::id), Some("a"));
  assert!(graph.find_node("nope").is_none());
  let targets: Vec<&str> = graph.outgoing_edges("from").iter().map(|e| e.target.as_str()).collect();
  assert_eq!(targets, vec!["b", "a"]);
}

#[test]
fn test_duplicate_node_ids_last_wins() {
  let workflow = Workflow::new("x", vec![Node::start("x"), Node::end("x")], vec![]);
  let graph = Graph::new(&workflow);
  assert_eq!(graph.find_node("x").map(Node::type_name), Some("end"));
}
