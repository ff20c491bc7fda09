// ruleflow/src/conditional/mod.rs

//! Condition trees, the operators their leaves use, and the evaluator that runs them against the
//! context store.

pub mod builtins;
pub mod condition;
pub mod evaluator;
pub mod operator;

pub use condition::{Condition, LeafCondition};
pub use evaluator::ConditionEvaluator;
pub use operator::{operator_fn, ConditionOperator, FnOperator};
