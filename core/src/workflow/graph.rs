// ruleflow/src/workflow/graph.rs

//! Fast node lookup and ordered outgoing edges over a borrowed `Workflow`.

use crate::workflow::definition::{Edge, Node, Workflow};
use std::collections::HashMap;

/// Node ids are expected to be unique; when they are not, the last declared node wins.
/// Construction does not check that edges point at existing nodes.
#[derive(Debug)]
pub struct Graph<'w> {
  nodes: HashMap<&'w str, &'w Node>,
  edges: &'w [Edge],
}

impl<'w> Graph<'w> {
  pub fn new(workflow: &'w Workflow) -> Self {
    let nodes = workflow.nodes.iter().map(|node| (node.id(), node)).collect();
    Self {
      nodes,
      edges: &workflow.edges,
    }
  }

  pub fn find_node(&self, id: &str) -> Option<&'w Node> {
    self.nodes.get(id).copied()
  }

  /// Edges leaving `source_id`, in declaration order.
  pub fn outgoing_edges(&self, source_id: &str) -> Vec<&'w Edge> {
    self.edges.iter().filter(|edge| edge.source == source_id).collect()
  }
}
