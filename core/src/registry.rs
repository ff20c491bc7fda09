// ruleflow/src/registry.rs

//! Name-keyed registries for the pluggable parts of the engine: action executors (keyed by operation
//! type) and condition operators (keyed by operator name).
//!
//! Registration validates names up front: an empty name or a name registered twice in the same
//! registry is rejected with `FlowError::Registration`. Host-supplied operators are merged over the
//! built-ins afterwards, so overriding a built-in by name is allowed.

use crate::conditional::builtins::BUILTIN_OPERATORS;
use crate::conditional::operator::{operator_fn, ConditionOperator};
use crate::core::executor::ActionExecutor;
use crate::error::{FlowError, FlowResult};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

pub struct NamedRegistry<T: ?Sized> {
  kind: &'static str,
  entries: HashMap<String, Arc<T>>,
}

/// Operation type -> executor. Seeded only from host-supplied executors.
pub type ExecutorRegistry = NamedRegistry<dyn ActionExecutor>;

/// Operator name -> predicate.
pub type OperatorRegistry = NamedRegistry<dyn ConditionOperator>;

impl<T: ?Sized> NamedRegistry<T> {
  /// Creates an empty registry. `kind` names the entries in error messages ("executor", "operator").
  pub fn new(kind: &'static str) -> Self {
    Self {
      kind,
      entries: HashMap::new(),
    }
  }

  pub fn register(&mut self, name: impl Into<String>, item: Arc<T>) -> FlowResult<()> {
    let name = name.into();
    if name.trim().is_empty() {
      return Err(FlowError::Registration {
        kind: self.kind,
        name,
        message: "name must not be empty".to_string(),
      });
    }
    if self.entries.contains_key(&name) {
      return Err(FlowError::Registration {
        kind: self.kind,
        name,
        message: "name is already registered".to_string(),
      });
    }
    event!(Level::DEBUG, kind = self.kind, name = %name, "Registering entry.");
    self.entries.insert(name, item);
    Ok(())
  }

  /// Inserts every entry of `other`, replacing entries with the same name.
  pub fn merge_overriding(&mut self, other: NamedRegistry<T>) {
    for (name, item) in other.entries {
      if self.entries.insert(name.clone(), item).is_some() {
        event!(Level::DEBUG, kind = self.kind, name = %name, "Overriding existing entry.");
      }
    }
  }

  pub fn get(&self, name: &str) -> Option<&Arc<T>> {
    self.entries.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }
}

impl OperatorRegistry {
  /// A registry holding every built-in operator.
  pub fn builtin() -> Self {
    let mut registry = Self::new("operator");
    for (name, predicate) in BUILTIN_OPERATORS {
      let op: Arc<dyn ConditionOperator> = Arc::new(operator_fn(*predicate));
      registry.entries.insert((*name).to_string(), op);
    }
    registry
  }
}

impl<T: ?Sized> fmt::Debug for NamedRegistry<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut names: Vec<&str> = self.names().collect();
    names.sort_unstable();
    f.debug_struct("NamedRegistry")
      .field("kind", &self.kind)
      .field("names", &names)
      .finish()
  }
}
