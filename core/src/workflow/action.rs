// ruleflow/src/workflow/action.rs

//! The action node pipeline: gate, delay, transform, render, execute, record.

use crate::core::context_data::ContextData;
use crate::core::log::{ExecutionLog, LogEvent};
use crate::engine::Engine;
use crate::error::{FlowError, FlowResult};
use crate::template::adapter::{apply_transformations, render_templates};
use crate::workflow::definition::ActionNode;

use serde_json::Value;
use std::sync::Arc;
use tracing::{event, Level};

impl Engine {
  pub(crate) async fn run_action(&self, node: &ActionNode, ctx: &ContextData, log: &mut ExecutionLog) -> FlowResult<()> {
    if let Some(conditions) = &node.conditions {
      if !self.evaluator.check_conditions(conditions, ctx).await {
        event!(Level::INFO, "Action conditions not met, skipping.");
        return Ok(());
      }
    }

    if let Some(delay) = node.delay() {
      event!(Level::DEBUG, delay_ms = delay.as_millis() as u64, "Delaying action.");
      tokio::time::sleep(delay).await;
    }

    apply_transformations(self.templates.as_ref(), &node.id, &node.transformations, ctx).await?;

    let rendered = render_templates(self.templates.as_ref(), &node.id, &node.templates, ctx).await?;
    ctx.store_templates(&node.id, Value::Object(rendered.clone()))?;

    let operation_type = node.operation.kind.as_str();
    let executor = self
      .executors
      .get(operation_type)
      .map(Arc::clone)
      .ok_or_else(|| FlowError::ExecutorNotFound {
        node_id: node.id.clone(),
        operation_type: operation_type.to_string(),
      })?;

    event!(Level::TRACE, operation_type, "Invoking executor.");
    let result = executor
      .execute(&node.operation, &rendered, ctx.clone())
      .await
      .map_err(|source| FlowError::ExecutorFailure {
        node_id: node.id.clone(),
        operation_type: operation_type.to_string(),
        source,
      })?;

    ctx.store_action_result(&node.id, result.clone())?;
    log.record(
      LogEvent::ActionExecuted {
        result,
        templates: rendered,
      },
      Some(&node.id),
    );
    Ok(())
  }
}
