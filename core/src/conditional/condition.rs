// ruleflow/src/conditional/condition.rs

//! Boolean expression trees evaluated against the context store.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A recursive boolean expression: `and`, `or`, `not`, or a leaf comparison.
///
/// In JSON, combinators are objects with `"type": "and" | "or" | "not"`. Any other `type` (or none)
/// denotes a leaf; the leaf's `type` is a free-form label the evaluator ignores.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawCondition")]
pub enum Condition {
  And { conditions: Vec<Condition> },
  Or { conditions: Vec<Condition> },
  Not { condition: Box<Condition> },
  Leaf(LeafCondition),
}

/// Compares the value at `field` with `value` using the operator registered as `operator`.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafCondition {
  pub label: Option<String>,
  pub field: String,
  pub operator: String,
  /// `None` when the definition has no `value`; an explicit JSON `null` is `Some(Value::Null)`.
  pub value: Option<Value>,
}

impl Condition {
  pub fn and(conditions: Vec<Condition>) -> Self {
    Condition::And { conditions }
  }

  pub fn or(conditions: Vec<Condition>) -> Self {
    Condition::Or { conditions }
  }

  #[allow(clippy::should_implement_trait)]
  pub fn not(condition: Condition) -> Self {
    Condition::Not {
      condition: Box::new(condition),
    }
  }

  pub fn leaf(field: impl Into<String>, operator: impl Into<String>, value: impl Into<Option<Value>>) -> Self {
    Condition::Leaf(LeafCondition {
      label: None,
      field: field.into(),
      operator: operator.into(),
      value: value.into(),
    })
  }
}

#[derive(Deserialize)]
struct RawCondition {
  #[serde(rename = "type", default)]
  kind: Option<String>,
  #[serde(default)]
  conditions: Option<Vec<Condition>>,
  #[serde(default)]
  condition: Option<Box<Condition>>,
  #[serde(default)]
  field: Option<String>,
  #[serde(default)]
  operator: Option<String>,
  #[serde(default, deserialize_with = "deserialize_present")]
  value: Option<Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
  D: Deserializer<'de>,
{
  Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawCondition> for Condition {
  type Error = String;

  fn try_from(raw: RawCondition) -> Result<Self, Self::Error> {
    match raw.kind.as_deref() {
      Some("and") => Ok(Condition::And {
        conditions: raw.conditions.unwrap_or_default(),
      }),
      Some("or") => Ok(Condition::Or {
        conditions: raw.conditions.unwrap_or_default(),
      }),
      Some("not") => raw
        .condition
        .map(|condition| Condition::Not { condition })
        .ok_or_else(|| "`not` condition requires a `condition` field".to_string()),
      _ => {
        let field = raw.field.ok_or_else(|| "leaf condition requires a `field`".to_string())?;
        let operator = raw
          .operator
          .ok_or_else(|| format!("leaf condition on '{}' requires an `operator`", field))?;
        Ok(Condition::Leaf(LeafCondition {
          label: raw.kind,
          field,
          operator,
          value: raw.value,
        }))
      }
    }
  }
}
