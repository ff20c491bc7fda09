// ruleflow/src/workflow/definition.rs

//! Contains the `Workflow` definition: typed nodes, conditional edges, and their JSON shape.
//! Definitions are immutable inputs; a run never modifies them.

use crate::conditional::condition::Condition;
use crate::core::executor::Operation;
use crate::error::FlowResult;

use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
  pub initial_node_id: String,
  #[serde(default)]
  pub nodes: Vec<Node>,
  #[serde(default)]
  pub edges: Vec<Edge>,
}

impl Workflow {
  pub fn new(initial_node_id: impl Into<String>, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
    Self {
      initial_node_id: initial_node_id.into(),
      nodes,
      edges,
    }
  }

  pub fn from_json(json: &str) -> FlowResult<Self> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn from_value(value: Value) -> FlowResult<Self> {
    Ok(serde_json::from_value(value)?)
  }
}

/// A unit of workflow behavior, tagged by `type` in JSON.
///
/// Unknown `type` tags load as `Unrecognized` and fail the run only if traversal reaches them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub enum Node {
  Start { id: String },
  End { id: String },
  Action(ActionNode),
  Condition(ConditionNode),
  Unrecognized { id: String, node_type: String },
}

impl Node {
  pub fn start(id: impl Into<String>) -> Self {
    Node::Start { id: id.into() }
  }

  pub fn end(id: impl Into<String>) -> Self {
    Node::End { id: id.into() }
  }

  pub fn id(&self) -> &str {
    match self {
      Node::Start { id } | Node::End { id } | Node::Unrecognized { id, .. } => id,
      Node::Action(action) => &action.id,
      Node::Condition(condition) => &condition.id,
    }
  }

  /// The `type` tag this node was declared with.
  pub fn type_name(&self) -> &str {
    match self {
      Node::Start { .. } => "start",
      Node::End { .. } => "end",
      Node::Action(_) => "action",
      Node::Condition(_) => "condition",
      Node::Unrecognized { node_type, .. } => node_type,
    }
  }
}

impl From<ActionNode> for Node {
  fn from(node: ActionNode) -> Self {
    Node::Action(node)
  }
}

impl From<ConditionNode> for Node {
  fn from(node: ConditionNode) -> Self {
    Node::Condition(node)
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionNode {
  pub id: String,
  /// Milliseconds to wait before doing any work. Zero means no wait.
  #[serde(default, rename = "delay")]
  pub delay_ms: Option<u64>,
  #[serde(default)]
  pub templates: Templates,
  #[serde(default)]
  pub transformations: Vec<Transformation>,
  pub operation: Operation,
  /// Gate: when present and not all true, the node does nothing.
  #[serde(default)]
  pub conditions: Option<Vec<Condition>>,
}

impl ActionNode {
  pub fn new(id: impl Into<String>, operation: Operation) -> Self {
    Self {
      id: id.into(),
      delay_ms: None,
      templates: Templates::default(),
      transformations: Vec::new(),
      operation,
      conditions: None,
    }
  }

  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay_ms = Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
    self
  }

  pub fn with_template(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
    self.templates.insert(name, template);
    self
  }

  pub fn with_transformation(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
    self.transformations.push(Transformation {
      field: field.into(),
      value: value.into(),
    });
    self
  }

  pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
    self.conditions = Some(conditions);
    self
  }

  pub fn delay(&self) -> Option<Duration> {
    self.delay_ms.filter(|ms| *ms > 0).map(Duration::from_millis)
  }
}

/// A pure branch node: its outcome picks between `passed` and `failed` edges.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionNode {
  pub id: String,
  #[serde(default)]
  pub conditions: Vec<Condition>,
}

impl ConditionNode {
  pub fn new(id: impl Into<String>, conditions: Vec<Condition>) -> Self {
    Self {
      id: id.into(),
      conditions,
    }
  }
}

/// Writes the rendered `value` template at the dotted path `field`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transformation {
  pub field: String,
  pub value: String,
}

/// Named template strings of an action node, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Templates(Vec<(String, String)>);

impl Templates {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds or replaces a template. A replaced template keeps its original position.
  pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
    let name = name.into();
    let template = template.into();
    match self.0.iter_mut().find(|(existing, _)| *existing == name) {
      Some((_, slot)) => *slot = template,
      None => self.0.push((name, template)),
    }
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.iter().find(|(n, _)| n == name).map(|(_, t)| t.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(n, t)| (n.as_str(), t.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl TryFrom<Map<String, Value>> for Templates {
  type Error = String;

  fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
    let mut templates = Templates::new();
    for (name, value) in map {
      match value {
        Value::String(template) => templates.insert(name, template),
        other => return Err(format!("template '{}' must be a string, got {}", name, other)),
      }
    }
    Ok(templates)
  }
}

/// A directed connection. `condition` is a coarse tag matched against a branch outcome;
/// `conditions` is a guard evaluated when the edge is considered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Edge {
  pub source: String,
  pub target: String,
  #[serde(default)]
  pub condition: Option<String>,
  #[serde(default)]
  pub conditions: Option<Vec<Condition>>,
}

impl Edge {
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      target: target.into(),
      condition: None,
      conditions: None,
    }
  }

  /// Restricts the edge to a branch outcome tag (`"passed"`, `"failed"`, ...).
  pub fn tagged(mut self, tag: impl Into<String>) -> Self {
    self.condition = Some(tag.into());
    self
  }

  pub fn guarded_by(mut self, conditions: Vec<Condition>) -> Self {
    self.conditions = Some(conditions);
    self
  }
}

#[derive(Deserialize)]
struct RawNode {
  id: String,
  #[serde(rename = "type")]
  node_type: String,
  #[serde(flatten)]
  rest: Map<String, Value>,
}

impl TryFrom<RawNode> for Node {
  type Error = String;

  fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
    let RawNode { id, node_type, mut rest } = raw;
    match node_type.as_str() {
      "start" => Ok(Node::Start { id }),
      "end" => Ok(Node::End { id }),
      "action" => {
        rest.insert("id".to_string(), Value::String(id.clone()));
        serde_json::from_value::<ActionNode>(Value::Object(rest))
          .map(Node::Action)
          .map_err(|e| format!("invalid action node '{}': {}", id, e))
      }
      "condition" => {
        rest.insert("id".to_string(), Value::String(id.clone()));
        serde_json::from_value::<ConditionNode>(Value::Object(rest))
          .map(Node::Condition)
          .map_err(|e| format!("invalid condition node '{}': {}", id, e))
      }
      _ => Ok(Node::Unrecognized { id, node_type }),
    }
  }
}
