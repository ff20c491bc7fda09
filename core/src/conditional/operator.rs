// ruleflow/src/conditional/operator.rs

//! Defines the `ConditionOperator` trait used by condition leaves.

use async_trait::async_trait;
use serde_json::Value;

/// A named predicate comparing the value resolved from a leaf's `field` with the leaf's `value`.
///
/// `actual` is `None` when the field path resolved to nothing (undefined), which is distinct from
/// `Some(Value::Null)`. `expected` is `None` when the leaf carries no `value`.
///
/// Operators are ordinary synchronous predicates in practice; the trait is async so a host can plug
/// in one that suspends.
#[async_trait]
pub trait ConditionOperator: Send + Sync {
  async fn evaluate(&self, actual: Option<&Value>, expected: Option<&Value>) -> bool;
}

/// Adapts a synchronous predicate into a `ConditionOperator`.
pub struct FnOperator<F>(F);

#[async_trait]
impl<F> ConditionOperator for FnOperator<F>
where
  F: Fn(Option<&Value>, Option<&Value>) -> bool + Send + Sync,
{
  async fn evaluate(&self, actual: Option<&Value>, expected: Option<&Value>) -> bool {
    (self.0)(actual, expected)
  }
}

/// Shorthand for wrapping a predicate closure or `fn`.
pub fn operator_fn<F>(f: F) -> FnOperator<F>
where
  F: Fn(Option<&Value>, Option<&Value>) -> bool + Send + Sync,
{
  FnOperator(f)
}
