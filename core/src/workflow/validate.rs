// ruleflow/src/workflow/validate.rs

//! Static checks over a workflow definition. Running a workflow never requires them; they surface
//! definition mistakes before a run halts on them.

use crate::workflow::definition::{Node, Workflow};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
  #[error("Initial node '{node_id}' is not defined")]
  MissingInitialNode { node_id: String },

  #[error("Node id '{node_id}' is defined more than once; the last definition wins")]
  DuplicateNodeId { node_id: String },

  #[error("Edge {from} -> {to} starts at an undefined node")]
  DanglingEdgeSource { from: String, to: String },

  #[error("Edge {from} -> {to} points at an undefined node")]
  DanglingEdgeTarget { from: String, to: String },

  #[error("Node '{node_id}' has unrecognized type '{node_type}'")]
  UnrecognizedNodeType { node_id: String, node_type: String },
}

impl Workflow {
  /// Lists every problem found, in a stable order: nodes first, then edges, then the initial node.
  pub fn validate(&self) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for node in &self.nodes {
      if !seen.insert(node.id()) {
        issues.push(ValidationIssue::DuplicateNodeId {
          node_id: node.id().to_string(),
        });
      }
      if let Node::Unrecognized { id, node_type } = node {
        issues.push(ValidationIssue::UnrecognizedNodeType {
          node_id: id.clone(),
          node_type: node_type.clone(),
        });
      }
    }

    for edge in &self.edges {
      if !seen.contains(edge.source.as_str()) {
        issues.push(ValidationIssue::DanglingEdgeSource {
          from: edge.source.clone(),
          to: edge.target.clone(),
        });
      }
      if !seen.contains(edge.target.as_str()) {
        issues.push(ValidationIssue::DanglingEdgeTarget {
          from: edge.source.clone(),
          to: edge.target.clone(),
        });
      }
    }

    if !seen.contains(self.initial_node_id.as_str()) {
      issues.push(ValidationIssue::MissingInitialNode {
        node_id: self.initial_node_id.clone(),
      });
    }

    issues
  }
}
