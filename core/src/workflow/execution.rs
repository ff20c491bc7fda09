// ruleflow/src/workflow/execution.rs

//! Contains `Engine::run()`, the traversal driver: it walks the graph from the initial node, dispatches
//! on each node's type, and appends to the execution log.

use crate::core::context_data::ContextData;
use crate::core::control::{BranchOutcome, RunOutcome};
use crate::core::log::{ExecutionLog, LogEvent};
use crate::engine::Engine;
use crate::error::{FlowError, FlowResult};
use crate::workflow::definition::{Node, Workflow};
use crate::workflow::graph::Graph;

use serde_json::Value;
use std::collections::HashSet;
use tracing::{event, instrument, span, Instrument, Level};

impl Engine {
  /// Runs `workflow` against a deep copy of `initial_context`.
  ///
  /// Each node id is entered at most once; reaching an already visited id ends the run normally.
  /// Reaching an id with no node ends the run with an `error` log entry, still returning `Ok`.
  /// Unknown executors, unrecognized node types, template failures and executor failures return `Err`.
  #[instrument(
        name = "Engine::run",
        skip_all,
        fields(
            initial_node = %workflow.initial_node_id,
            num_nodes = workflow.nodes.len(),
            num_edges = workflow.edges.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, workflow: &Workflow, initial_context: &Value) -> FlowResult<RunOutcome> {
    event!(Level::DEBUG, "Workflow run starting.");

    let graph = Graph::new(workflow);
    let ctx = ContextData::new(initial_context.clone());
    let mut log = ExecutionLog::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = Some(workflow.initial_node_id.clone());

    while let Some(node_id) = current.take() {
      if !visited.insert(node_id.clone()) {
        event!(Level::DEBUG, node_id = %node_id, "Node already visited, halting traversal.");
        break;
      }

      let Some(node) = graph.find_node(&node_id) else {
        event!(Level::WARN, node_id = %node_id, "Node not found, halting traversal.");
        log.record(
          LogEvent::Error {
            message: format!("Node not found: {}", node_id),
          },
          Some(&node_id),
        );
        break;
      };

      log.record(LogEvent::NodeEnter, Some(&node_id));
      let node_span = span!(
        Level::INFO,
        "workflow_node",
        node_id = %node_id,
        node_type = node.type_name()
      );
      let transition = self.visit(node, &graph, &ctx, &mut log).instrument(node_span).await;
      log.record(LogEvent::NodeExit, Some(&node_id));

      current = match transition {
        Ok(next) => next,
        Err(e) => {
          event!(Level::ERROR, node_id = %node_id, error = %e, "Node failed, aborting run.");
          return Err(e);
        }
      };
    }

    let data = ctx.snapshot();
    log.record(LogEvent::Complete { data: data.clone() }, None);
    event!(Level::DEBUG, visited = visited.len(), "Workflow run completed.");
    Ok(RunOutcome {
      data,
      logs: log.into_entries(),
    })
  }

  /// Performs one node's work and returns the id of the next node, if any.
  async fn visit(
    &self,
    node: &Node,
    graph: &Graph<'_>,
    ctx: &ContextData,
    log: &mut ExecutionLog,
  ) -> FlowResult<Option<String>> {
    match node {
      Node::Start { id } => Ok(self.select_next(graph, ctx, id, None).await),
      Node::Condition(condition) => {
        let passed = self.evaluator.check_conditions(&condition.conditions, ctx).await;
        let outcome = BranchOutcome::from_bool(passed);
        event!(Level::DEBUG, outcome = outcome.as_tag(), "Condition node evaluated.");
        Ok(self.select_next(graph, ctx, &condition.id, Some(outcome)).await)
      }
      Node::Action(action) => {
        self.run_action(action, ctx, log).await?;
        Ok(self.select_next(graph, ctx, &action.id, None).await)
      }
      Node::End { .. } => Ok(None),
      Node::Unrecognized { id, node_type } => Err(FlowError::UnrecognizedNodeType {
        node_id: id.clone(),
        node_type: node_type.clone(),
      }),
    }
  }
}
