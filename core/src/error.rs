// ruleflow/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failures that abort a workflow run (or an engine's construction).
///
/// A run that reaches a node id with no matching node is *not* an error: it completes and records an
/// `error` entry in its execution log instead. Unknown condition operators are not errors either; the
/// leaf simply evaluates to `false`.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("No executor registered for operation type '{operation_type}' (node '{node_id}')")]
  ExecutorNotFound { node_id: String, operation_type: String },

  #[error("Unrecognized node type '{node_type}' for node '{node_id}'")]
  UnrecognizedNodeType { node_id: String, node_type: String },

  #[error("Template '{template}' failed to render for node '{node_id}'. Source: {source}")]
  TemplateRender {
    node_id: String,
    template: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Executor for operation type '{operation_type}' failed on node '{node_id}'. Source: {source}")]
  ExecutorFailure {
    node_id: String,
    operation_type: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Invalid context path '{path}': {message}")]
  InvalidPath { path: String, message: String },

  #[error("Cannot register {kind} '{name}': {message}")]
  Registration {
    kind: &'static str,
    name: String,
    message: String,
  },

  #[error("Invalid workflow definition. Source: {source}")]
  Deserialization {
    #[source]
    source: serde_json::Error,
  },
}

impl From<serde_json::Error> for FlowError {
  fn from(err: serde_json::Error) -> Self {
    FlowError::Deserialization { source: err }
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
