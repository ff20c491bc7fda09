// ruleflow/src/core/executor.rs

//! Defines the `ActionExecutor` trait implemented by host-supplied action handlers, the opaque
//! `Operation` payload they interpret, and `FnExecutor` for closure-based executors.

use crate::core::context_data::ContextData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

/// Rendered templates of one action node, template name to rendered string, in declaration order.
pub type RenderedTemplates = Map<String, Value>;

/// Executor-specific payload of an action node. Only `type` is interpreted by the engine; it selects
/// the executor. Every other field is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(flatten)]
  pub fields: Map<String, Value>,
}

impl Operation {
  pub fn new(kind: impl Into<String>) -> Self {
    Self {
      kind: kind.into(),
      fields: Map::new(),
    }
  }

  pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
    self.fields.insert(name.into(), value);
    self
  }

  pub fn field(&self, name: &str) -> Option<&Value> {
    self.fields.get(name)
  }
}

/// A host-supplied handler performing the real-world effect of an action node.
///
/// Executors receive the run's shared `ContextData` and may read or mutate it in place. They must
/// not hold its lock guards across `.await` points, nor retain the handle after returning.
/// The returned value is stored under `__actionResults.<nodeId>`; an error aborts the run.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
  async fn execute(
    &self,
    operation: &Operation,
    templates: &RenderedTemplates,
    context: ContextData,
  ) -> anyhow::Result<Value>;
}

/// Boxed future returned by closure executors.
pub type ExecutorFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;

/// Adapts a closure into an `ActionExecutor`. The closure receives owned copies of the operation and
/// the rendered templates so its future can be `'static`.
pub struct FnExecutor<F>(F);

impl<F> FnExecutor<F>
where
  F: Fn(Operation, RenderedTemplates, ContextData) -> ExecutorFuture + Send + Sync + 'static,
{
  pub fn new(f: F) -> Self {
    FnExecutor(f)
  }
}

#[async_trait]
impl<F> ActionExecutor for FnExecutor<F>
where
  F: Fn(Operation, RenderedTemplates, ContextData) -> ExecutorFuture + Send + Sync + 'static,
{
  async fn execute(
    &self,
    operation: &Operation,
    templates: &RenderedTemplates,
    context: ContextData,
  ) -> anyhow::Result<Value> {
    (self.0)(operation.clone(), templates.clone(), context).await
  }
}

/// Shorthand for `FnExecutor::new`.
pub fn executor_fn<F>(f: F) -> FnExecutor<F>
where
  F: Fn(Operation, RenderedTemplates, ContextData) -> ExecutorFuture + Send + Sync + 'static,
{
  FnExecutor::new(f)
}
