// ruleflow/src/core/control.rs

//! Branch outcomes produced by condition nodes and the final result of a run.

use crate::core::log::LogEntry;
use serde::Serialize;
use serde_json::Value;

/// Outcome of a condition node, matched against the coarse `condition` tag of its outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
  /// Every condition of the node held.
  Passed,
  /// At least one condition of the node evaluated to false.
  Failed,
}

impl BranchOutcome {
  pub fn from_bool(passed: bool) -> Self {
    if passed {
      BranchOutcome::Passed
    } else {
      BranchOutcome::Failed
    }
  }

  /// The edge tag this outcome selects.
  pub fn as_tag(&self) -> &'static str {
    match self {
      BranchOutcome::Passed => "passed",
      BranchOutcome::Failed => "failed",
    }
  }
}

/// Outcome of a full workflow run: the final context document and the execution log.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
  pub data: Value,
  pub logs: Vec<LogEntry>,
}

impl RunOutcome {
  /// True when the run halted on a node id that resolved to no node.
  pub fn has_errors(&self) -> bool {
    self.logs.iter().any(LogEntry::is_error)
  }
}
