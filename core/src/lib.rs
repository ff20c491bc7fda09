// src/lib.rs

//! Ruleflow: an ASYNC, embeddable interpreter for declarative workflow graphs.
//!
//! A workflow is a directed graph of typed nodes joined by optionally guarded edges. Ruleflow walks
//! the graph from its initial node and:
//!  - Evaluates boolean condition trees (`and`/`or`/`not`/leaf) against a mutable JSON context.
//!  - Branches on condition nodes through `passed`/`failed` tagged edges.
//!  - Runs action nodes: gating conditions, delay, transformations, templates, then a host-supplied
//!    executor whose result lands back in the context.
//!  - Records an append-only execution log returned alongside the final context.
//!
//! Executors, extra condition operators and the template engine are pluggable through `RunOptions`.

pub mod conditional;
pub mod core;
pub mod engine;
pub mod error;
pub mod registry;
pub mod template;
pub mod workflow;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::core::context_data::{ContextData, ACTION_RESULTS_KEY, TEMPLATES_KEY};
pub use crate::core::control::{BranchOutcome, RunOutcome};
pub use crate::core::executor::{executor_fn, ActionExecutor, ExecutorFuture, FnExecutor, Operation, RenderedTemplates};
pub use crate::core::log::{LogEntry, LogEvent, LogStep};

// Conditions and operators
pub use crate::conditional::{operator_fn, Condition, ConditionEvaluator, ConditionOperator, FnOperator, LeafCondition};

// Templates
pub use crate::template::{JinjaTemplateEngine, TemplateEngine, TemplateScope};

// Workflow definitions
pub use crate::workflow::{ActionNode, ConditionNode, Edge, Graph, Node, Templates, Transformation, ValidationIssue, Workflow};

// The engine and its configuration
pub use crate::engine::{run, Engine, RunOptions};
pub use crate::registry::{ExecutorRegistry, NamedRegistry, OperatorRegistry};

pub use crate::error::{FlowError, FlowResult};

/*
    Core Workflow:
    1. Describe the graph as a `Workflow` (built in code or loaded with `Workflow::from_json`).
    2. Implement `ActionExecutor` (or use `executor_fn`) for every operation type the workflow uses.
    3. Collect them in `RunOptions`, optionally with custom operators and a template engine.
    4. Build an `Engine` once (`Engine::new(options)?`), or call `ruleflow::run` for a one-shot run.
    5. `engine.run(&workflow, &initial_context).await` returns `RunOutcome { data, logs }`:
       - `Err(FlowError)` means the run was rejected (unknown executor, executor/template failure, ...).
       - `Ok` with an `error` log entry means traversal hit a node id with no node and stopped.
*/
