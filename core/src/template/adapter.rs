// ruleflow/src/template/adapter.rs

//! Bridges action nodes and the template engine: renders a node's named templates and applies its
//! transformations to the context store.

use crate::core::context_data::ContextData;
use crate::core::executor::RenderedTemplates;
use crate::error::{FlowError, FlowResult};
use crate::template::{TemplateEngine, TemplateScope};
use crate::workflow::definition::{Templates, Transformation};

use serde_json::Value;
use tracing::{event, instrument, Level};

/// Renders every template of a node against the same context snapshot, in declaration order.
#[instrument(name = "render_templates", skip_all, fields(node_id = %node_id, count = templates.len()), err(Display))]
pub async fn render_templates(
  engine: &dyn TemplateEngine,
  node_id: &str,
  templates: &Templates,
  ctx: &ContextData,
) -> FlowResult<RenderedTemplates> {
  let scope = TemplateScope::new(ctx.snapshot());
  let mut rendered = RenderedTemplates::new();
  for (name, source) in templates.iter() {
    let output = engine
      .render(source, &scope)
      .await
      .map_err(|source| FlowError::TemplateRender {
        node_id: node_id.to_string(),
        template: name.to_string(),
        source,
      })?;
    rendered.insert(name.to_string(), Value::String(output));
  }
  Ok(rendered)
}

/// Applies transformations one after the other. Each one renders against the context as left by the
/// previous one and writes its string result at its `field` path.
#[instrument(name = "apply_transformations", skip_all, fields(node_id = %node_id, count = transformations.len()), err(Display))]
pub async fn apply_transformations(
  engine: &dyn TemplateEngine,
  node_id: &str,
  transformations: &[Transformation],
  ctx: &ContextData,
) -> FlowResult<()> {
  for transformation in transformations {
    let scope = TemplateScope::new(ctx.snapshot());
    let output = engine
      .render(&transformation.value, &scope)
      .await
      .map_err(|source| FlowError::TemplateRender {
        node_id: node_id.to_string(),
        template: transformation.field.clone(),
        source,
      })?;
    event!(Level::TRACE, field = %transformation.field, "Transformation applied.");
    ctx.set(&transformation.field, Value::String(output))?;
  }
  Ok(())
}
