// ruleflow/src/template/jinja.rs

//! Jinja2 template engine implementation via minijinja. This is the engine used when the host
//! configures none.
//!
//! Besides the context variables, templates can call `template(node_id, key)` and
//! `action_result(node_id)` to read the output of earlier nodes.

use crate::template::{TemplateEngine, TemplateScope};
use async_trait::async_trait;
use minijinja::{Environment, Value as JinjaValue};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct JinjaTemplateEngine;

impl JinjaTemplateEngine {
  pub fn new() -> Self {
    Self
  }
}

fn to_jinja(value: Option<&serde_json::Value>) -> JinjaValue {
  value.map(JinjaValue::from_serialize).unwrap_or(JinjaValue::UNDEFINED)
}

#[async_trait]
impl TemplateEngine for JinjaTemplateEngine {
  async fn render(&self, template: &str, scope: &TemplateScope) -> anyhow::Result<String> {
    let mut env = Environment::new();

    let shared = Arc::new(scope.clone());
    let for_templates = Arc::clone(&shared);
    env.add_function("template", move |node_id: String, key: String| {
      to_jinja(for_templates.template(&node_id, &key))
    });
    let for_results = Arc::clone(&shared);
    env.add_function("action_result", move |node_id: String| {
      to_jinja(for_results.action_result(&node_id))
    });

    env
      .render_str(template, JinjaValue::from_serialize(scope.data()))
      .map_err(|e| anyhow::anyhow!("Template render error: {}", e))
  }
}
