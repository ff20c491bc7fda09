// ruleflow/src/engine.rs

//! Defines `RunOptions`, the host configuration of an engine, and `Engine`, which owns the validated
//! registries and the template engine. The traversal itself lives in `crate::workflow`.

use crate::conditional::evaluator::ConditionEvaluator;
use crate::conditional::operator::ConditionOperator;
use crate::core::control::RunOutcome;
use crate::core::executor::ActionExecutor;
use crate::error::FlowResult;
use crate::registry::{ExecutorRegistry, OperatorRegistry};
use crate::template::{JinjaTemplateEngine, TemplateEngine};
use crate::workflow::definition::Workflow;

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

/// Host-supplied configuration: custom executors, custom operators and the template engine.
///
/// Nothing is validated until `Engine::new`.
#[derive(Default)]
pub struct RunOptions {
  executors: Vec<(String, Arc<dyn ActionExecutor>)>,
  operators: Vec<(String, Arc<dyn ConditionOperator>)>,
  template_engine: Option<Arc<dyn TemplateEngine>>,
}

impl RunOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers the executor handling operations of type `operation_type`.
  pub fn with_executor(mut self, operation_type: impl Into<String>, executor: impl ActionExecutor + 'static) -> Self {
    self.executors.push((operation_type.into(), Arc::new(executor)));
    self
  }

  pub fn with_shared_executor(mut self, operation_type: impl Into<String>, executor: Arc<dyn ActionExecutor>) -> Self {
    self.executors.push((operation_type.into(), executor));
    self
  }

  /// Registers a condition operator. A built-in operator with the same name is replaced.
  pub fn with_operator(mut self, name: impl Into<String>, operator: impl ConditionOperator + 'static) -> Self {
    self.operators.push((name.into(), Arc::new(operator)));
    self
  }

  pub fn with_template_engine(mut self, engine: impl TemplateEngine + 'static) -> Self {
    self.template_engine = Some(Arc::new(engine));
    self
  }
}

impl fmt::Debug for RunOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RunOptions")
      .field("executors", &self.executors.iter().map(|(n, _)| n).collect::<Vec<_>>())
      .field("operators", &self.operators.iter().map(|(n, _)| n).collect::<Vec<_>>())
      .field("custom_template_engine", &self.template_engine.is_some())
      .finish()
  }
}

/// A configured workflow interpreter. One engine can run any number of workflows, sequentially or
/// concurrently; runs share no state besides the registries.
pub struct Engine {
  pub(crate) executors: ExecutorRegistry,
  pub(crate) evaluator: ConditionEvaluator,
  pub(crate) templates: Arc<dyn TemplateEngine>,
}

impl Engine {
  /// Validates `options` and builds the registries. Fails on empty or duplicate names.
  pub fn new(options: RunOptions) -> FlowResult<Self> {
    let mut executors = ExecutorRegistry::new("executor");
    for (name, executor) in options.executors {
      executors.register(name, executor)?;
    }

    let mut custom_operators = OperatorRegistry::new("operator");
    for (name, operator) in options.operators {
      custom_operators.register(name, operator)?;
    }
    let mut operators = OperatorRegistry::builtin();
    operators.merge_overriding(custom_operators);

    let templates = options
      .template_engine
      .unwrap_or_else(|| Arc::new(JinjaTemplateEngine::new()));

    event!(
      Level::DEBUG,
      executors = executors.len(),
      operators = operators.len(),
      "Engine configured."
    );
    Ok(Self {
      executors,
      evaluator: ConditionEvaluator::new(operators),
      templates,
    })
  }

  pub fn executors(&self) -> &ExecutorRegistry {
    &self.executors
  }

  pub fn evaluator(&self) -> &ConditionEvaluator {
    &self.evaluator
  }

  pub fn template_engine(&self) -> &dyn TemplateEngine {
    self.templates.as_ref()
  }
}

impl fmt::Debug for Engine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Engine")
      .field("executors", &self.executors)
      .field("evaluator", &self.evaluator)
      .finish_non_exhaustive()
  }
}

/// Builds a one-shot engine from `options` and runs `workflow` against a deep copy of `initial_context`.
pub async fn run(workflow: &Workflow, initial_context: &Value, options: RunOptions) -> FlowResult<RunOutcome> {
  Engine::new(options)?.run(workflow, initial_context).await
}
