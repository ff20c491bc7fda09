// ruleflow/src/template/mod.rs

//! The template-rendering capability consumed by action nodes.
//!
//! The engine never parses templates itself. It hands each template string, together with a
//! `TemplateScope` over the current context store, to the configured `TemplateEngine`.

pub mod adapter;
pub mod jinja;

use crate::core::context_data::{lookup, ACTION_RESULTS_KEY, TEMPLATES_KEY};
use async_trait::async_trait;
use serde_json::Value;

pub use jinja::JinjaTemplateEngine;

/// Renders a template string against a scope. Failures (e.g. a malformed template) abort the run.
#[async_trait]
pub trait TemplateEngine: Send + Sync {
  async fn render(&self, template: &str, scope: &TemplateScope) -> anyhow::Result<String>;
}

/// Variables visible to a template: a snapshot of the whole context store, plus accessors for the
/// output of previously executed nodes.
#[derive(Debug, Clone)]
pub struct TemplateScope {
  data: Value,
}

impl TemplateScope {
  pub fn new(data: Value) -> Self {
    Self { data }
  }

  pub fn data(&self) -> &Value {
    &self.data
  }

  /// Rendered template `key` of node `node_id`.
  pub fn template(&self, node_id: &str, key: &str) -> Option<&Value> {
    lookup(&self.data, [TEMPLATES_KEY, node_id, key])
  }

  /// Executor result of node `node_id`.
  pub fn action_result(&self, node_id: &str) -> Option<&Value> {
    lookup(&self.data, [ACTION_RESULTS_KEY, node_id])
  }
}
