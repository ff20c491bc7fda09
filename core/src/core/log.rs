// ruleflow/src/core/log.rs

//! The append-only execution log returned with every run.

use crate::core::executor::RenderedTemplates;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Kind of an execution log entry. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStep {
  NodeEnter,
  NodeExit,
  ActionExecuted,
  Error,
  Complete,
}

/// Step-specific payload of a log entry. Serialized flat next to `node` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum LogEvent {
  NodeEnter,
  NodeExit,
  ActionExecuted { result: Value, templates: RenderedTemplates },
  Error { message: String },
  Complete { data: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
  #[serde(flatten)]
  pub event: LogEvent,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub node: Option<String>,
  pub timestamp: DateTime<Utc>,
}

impl LogEntry {
  pub fn new(event: LogEvent, node: Option<&str>) -> Self {
    Self {
      event,
      node: node.map(str::to_string),
      timestamp: Utc::now(),
    }
  }

  pub fn step(&self) -> LogStep {
    match self.event {
      LogEvent::NodeEnter => LogStep::NodeEnter,
      LogEvent::NodeExit => LogStep::NodeExit,
      LogEvent::ActionExecuted { .. } => LogStep::ActionExecuted,
      LogEvent::Error { .. } => LogStep::Error,
      LogEvent::Complete { .. } => LogStep::Complete,
    }
  }

  pub fn is_error(&self) -> bool {
    self.step() == LogStep::Error
  }
}

/// Ordered record of everything the driver did. Entries are never modified once pushed.
#[derive(Debug, Default)]
pub(crate) struct ExecutionLog {
  entries: Vec<LogEntry>,
}

impl ExecutionLog {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn record(&mut self, event: LogEvent, node: Option<&str>) {
    self.entries.push(LogEntry::new(event, node));
  }

  pub(crate) fn into_entries(self) -> Vec<LogEntry> {
    self.entries
  }
}
