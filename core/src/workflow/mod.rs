// ruleflow/src/workflow/mod.rs

//! Workflow definitions and their interpretation: graph lookup, next-node selection, the action
//! pipeline and the traversal driver.

pub mod action;
pub mod definition;
pub mod execution;
pub mod graph;
pub mod selection;
pub mod validate;

pub use definition::{ActionNode, ConditionNode, Edge, Node, Templates, Transformation, Workflow};
pub use graph::Graph;
pub use validate::ValidationIssue;
