// ruleflow/src/core/context_data.rs

//! The context store threaded through a workflow run.
//!
//! `ContextData` is a shared handle over a dynamic JSON document. Every component of a run (condition
//! leaves, templates, transformations, executors) reads and writes the same document through dotted
//! paths such as `user.status` or `items[0].name`.

use crate::error::{FlowError, FlowResult};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Reserved namespace holding rendered templates, keyed by node id then template name.
pub const TEMPLATES_KEY: &str = "__templates";
/// Reserved namespace holding executor results, keyed by node id.
pub const ACTION_RESULTS_KEY: &str = "__actionResults";

/// A wrapper for the run's context document providing shared ownership and interior mutability
/// using parking_lot::RwLock.
///
/// IMPORTANT: Lock guards obtained from this struct are blocking and MUST NOT
/// be held across `.await` suspension points in asynchronous code.
#[derive(Debug)]
pub struct ContextData(Arc<RwLock<Value>>);

impl ContextData {
  /// Wraps `data`. A non-object root is replaced by an empty object so that paths always resolve
  /// against a mapping.
  pub fn new(data: Value) -> Self {
    let root = match data {
      Value::Object(_) => data,
      _ => Value::Object(Map::new()),
    };
    ContextData(Arc::new(RwLock::new(root)))
  }

  /// Acquires a read lock. The returned guard MUST be dropped before any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, Value> {
    self.0.read()
  }

  /// Acquires a write lock. The returned guard MUST be dropped before any `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, Value> {
    self.0.write()
  }

  /// Deep copy of the whole document.
  pub fn snapshot(&self) -> Value {
    self.read().clone()
  }

  /// Reads the value at a dotted path. Missing segments yield `None` (undefined), never an error.
  pub fn get(&self, path: &str) -> Option<Value> {
    let segments = parse_path(path);
    if segments.is_empty() {
      return None;
    }
    lookup(&self.read(), segments.iter().map(String::as_str)).cloned()
  }

  /// Writes `value` at a dotted path, creating intermediate containers as needed.
  pub fn set(&self, path: &str, value: Value) -> FlowResult<()> {
    let segments = parse_path(path);
    if segments.is_empty() {
      return Err(FlowError::InvalidPath {
        path: path.to_string(),
        message: "path has no segments".to_string(),
      });
    }
    assign(&mut self.write(), path, &segments, value)
  }

  /// Rendered output of template `key` on a previously executed node.
  pub fn template(&self, node_id: &str, key: &str) -> Option<Value> {
    lookup(&self.read(), [TEMPLATES_KEY, node_id, key]).cloned()
  }

  /// Result returned by the executor of a previously executed node.
  pub fn action_result(&self, node_id: &str) -> Option<Value> {
    lookup(&self.read(), [ACTION_RESULTS_KEY, node_id]).cloned()
  }

  // Node ids may contain dots, so the reserved namespaces are written segment-wise.
  pub(crate) fn store_templates(&self, node_id: &str, rendered: Value) -> FlowResult<()> {
    let path = format!("{}.{}", TEMPLATES_KEY, node_id);
    assign(&mut self.write(), &path, &[TEMPLATES_KEY.to_string(), node_id.to_string()], rendered)
  }

  pub(crate) fn store_action_result(&self, node_id: &str, result: Value) -> FlowResult<()> {
    let path = format!("{}.{}", ACTION_RESULTS_KEY, node_id);
    assign(&mut self.write(), &path, &[ACTION_RESULTS_KEY.to_string(), node_id.to_string()], result)
  }
}

impl Clone for ContextData {
  fn clone(&self) -> Self {
    ContextData(Arc::clone(&self.0))
  }
}

impl Default for ContextData {
  fn default() -> Self {
    Self::new(Value::Object(Map::new()))
  }
}

/// How far past the end of an array a write may land. The gap is filled with nulls.
pub const MAX_INDEX_GAP: usize = 1024;

/// Splits `a.b[0].c` into `["a", "b", "0", "c"]`. Empty segments are dropped.
pub fn parse_path(path: &str) -> Vec<String> {
  path
    .split(|c| c == '.' || c == '[' || c == ']')
    .filter(|segment| !segment.is_empty())
    .map(str::to_string)
    .collect()
}

/// Walks `segments` from `root`. Arrays are indexed by numeric segments, objects by key.
pub fn lookup<'v, 's>(root: &'v Value, segments: impl IntoIterator<Item = &'s str>) -> Option<&'v Value> {
  segments.into_iter().try_fold(root, |current, segment| match current {
    Value::Object(map) => map.get(segment),
    Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
    _ => None,
  })
}

fn is_index(segment: &str) -> bool {
  !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn empty_container_for(segment: &str) -> Value {
  if is_index(segment) {
    Value::Array(Vec::new())
  } else {
    Value::Object(Map::new())
  }
}

fn invalid_path(path: &str, message: String) -> FlowError {
  FlowError::InvalidPath {
    path: path.to_string(),
    message,
  }
}

fn assign(root: &mut Value, path: &str, segments: &[String], value: Value) -> FlowResult<()> {
  let Some((last, parents)) = segments.split_last() else {
    return Ok(());
  };

  let mut current = root;
  for (idx, segment) in parents.iter().enumerate() {
    let next_segment = segments[idx + 1].as_str();
    current = child_slot(current, path, segment)?;
    if !current.is_object() && !current.is_array() {
      *current = empty_container_for(next_segment);
    }
  }
  *child_slot(current, path, last)? = value;
  Ok(())
}

// Returns the slot for `segment` inside `container`, creating it (as null) when missing.
// A scalar container is replaced by an object; arrays only accept index segments.
fn child_slot<'v>(container: &'v mut Value, path: &str, segment: &str) -> FlowResult<&'v mut Value> {
  if !container.is_object() && !container.is_array() {
    *container = Value::Object(Map::new());
  }
  match container {
    Value::Array(items) => {
      let idx = segment
        .parse::<usize>()
        .map_err(|_| invalid_path(path, format!("segment '{}' cannot index an array", segment)))?;
      if idx > items.len().saturating_add(MAX_INDEX_GAP) {
        return Err(invalid_path(
          path,
          format!("index {} is too far past the end of an array of {} elements", idx, items.len()),
        ));
      }
      if items.len() <= idx {
        items.resize(idx + 1, Value::Null);
      }
      Ok(&mut items[idx])
    }
    Value::Object(map) => Ok(map.entry(segment.to_string()).or_insert(Value::Null)),
    _ => Err(invalid_path(path, format!("segment '{}' has no container", segment))),
  }
}
