// ruleflow/src/conditional/evaluator.rs

//! Evaluates condition trees against the context store.
//!
//! `and`/`or` nodes evaluate *all* of their children concurrently and only then combine the results;
//! they never short-circuit, so every child's operator runs. `check_conditions`, used to gate nodes and
//! edges, is the opposite: a sequential AND that stops at the first `false`.

use crate::conditional::condition::{Condition, LeafCondition};
use crate::core::context_data::ContextData;
use crate::registry::OperatorRegistry;

use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::{event, Level};

#[derive(Debug)]
pub struct ConditionEvaluator {
  operators: OperatorRegistry,
}

impl ConditionEvaluator {
  pub fn new(operators: OperatorRegistry) -> Self {
    Self { operators }
  }

  pub fn operators(&self) -> &OperatorRegistry {
    &self.operators
  }

  /// Evaluates a single condition tree.
  pub fn evaluate<'a>(&'a self, condition: &'a Condition, ctx: &'a ContextData) -> BoxFuture<'a, bool> {
    async move {
      match condition {
        Condition::And { conditions } => {
          let results = join_all(conditions.iter().map(|child| self.evaluate(child, ctx))).await;
          results.into_iter().all(|passed| passed)
        }
        Condition::Or { conditions } => {
          let results = join_all(conditions.iter().map(|child| self.evaluate(child, ctx))).await;
          results.into_iter().any(|passed| passed)
        }
        Condition::Not { condition } => !self.evaluate(condition, ctx).await,
        Condition::Leaf(leaf) => self.evaluate_leaf(leaf, ctx).await,
      }
    }
    .boxed()
  }

  async fn evaluate_leaf(&self, leaf: &LeafCondition, ctx: &ContextData) -> bool {
    let Some(operator) = self.operators.get(&leaf.operator) else {
      event!(Level::DEBUG, operator = %leaf.operator, field = %leaf.field, "Unknown operator, leaf evaluates to false.");
      return false;
    };
    let actual = ctx.get(&leaf.field);
    let passed = operator.evaluate(actual.as_ref(), leaf.value.as_ref()).await;
    event!(Level::TRACE, operator = %leaf.operator, field = %leaf.field, passed, "Leaf evaluated.");
    passed
  }

  /// Sequential AND with early exit. An empty list is vacuously true.
  pub async fn check_conditions(&self, conditions: &[Condition], ctx: &ContextData) -> bool {
    for condition in conditions {
      if !self.evaluate(condition, ctx).await {
        return false;
      }
    }
    true
  }
}
