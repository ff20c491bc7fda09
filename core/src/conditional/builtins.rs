// ruleflow/src/conditional/builtins.rs

//! Built-in condition operators. Hosts may override any of them by name.
//!
//! Every predicate receives the resolved field value (`None` = undefined) and the leaf's compare value.
//! Type mismatches make a predicate return `false`; no operator ever fails.

use chrono::DateTime;
use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Signature shared by all built-in operators.
pub type Predicate = fn(Option<&Value>, Option<&Value>) -> bool;

/// Name and predicate of every built-in operator.
pub const BUILTIN_OPERATORS: &[(&str, Predicate)] = &[
  // equality
  ("eq", eq),
  ("neq", neq),
  ("ieq", ieq),
  // ordering
  ("gt", gt),
  ("gte", gte),
  ("lt", lt),
  ("lte", lte),
  ("between", between),
  ("notbetween", not_between),
  // string
  ("contains", contains),
  ("notcontains", not_contains),
  ("icontains", icontains),
  ("startsWith", starts_with),
  ("endsWith", ends_with),
  ("regex", regex_match),
  ("matches", regex_match),
  ("empty", empty),
  ("notempty", not_empty),
  ("isUpperCase", is_upper_case),
  ("isLowerCase", is_lower_case),
  ("isDate", is_date),
  ("isjson", is_json),
  // membership
  ("in", is_in),
  ("nin", not_in),
  ("containsAll", contains_all),
  ("containsAny", contains_any),
  ("arrayEqual", array_equal),
  // type / nullness
  ("type", type_is),
  ("nottype", type_is_not),
  ("null", is_null),
  ("notnull", not_null),
  ("defined", defined),
  ("notdefined", not_defined),
  ("truthy", truthy),
  ("falsy", falsy),
  // length
  ("length", length_eq),
  ("lengthgt", length_gt),
  ("lengthgte", length_gte),
  ("lengthlt", length_lt),
  ("lengthlte", length_lte),
  // structural
  ("deepEqual", deep_equal),
  ("hasProperty", has_property),
  ("json", json_subset),
  // boolean
  ("true", is_true),
  ("false", is_false),
];

// ================================
// Shared helpers
// ================================

/// Structural equality where numbers compare by value (`1 == 1.0`).
pub fn values_equal(a: &Value, b: &Value) -> bool {
  match (a, b) {
    (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
    (Value::Array(xs), Value::Array(ys)) => xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y)),
    (Value::Object(xs), Value::Object(ys)) => {
      xs.len() == ys.len() && xs.iter().all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
    }
    _ => a == b,
  }
}

fn option_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (a, b) {
    (None, None) => true,
    (Some(x), Some(y)) => values_equal(x, y),
    _ => false,
  }
}

/// Numbers order numerically, strings lexicographically; anything else is incomparable.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
  match (a?, b?) {
    (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
    (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
    _ => None,
  }
}

fn bounds(expected: Option<&Value>) -> Option<(&Value, &Value)> {
  match expected? {
    Value::Array(range) if range.len() == 2 => Some((&range[0], &range[1])),
    _ => None,
  }
}

fn as_str(v: Option<&Value>) -> Option<&str> {
  v.and_then(Value::as_str)
}

fn array_contains(items: &[Value], needle: &Value) -> bool {
  items.iter().any(|item| values_equal(item, needle))
}

fn length_of(v: Option<&Value>) -> Option<usize> {
  match v? {
    Value::String(s) => Some(s.chars().count()),
    Value::Array(items) => Some(items.len()),
    _ => None,
  }
}

fn compare_length(actual: Option<&Value>, expected: Option<&Value>, accept: fn(Ordering) -> bool) -> bool {
  match (length_of(actual), expected.and_then(Value::as_f64)) {
    (Some(len), Some(bound)) => (len as f64).partial_cmp(&bound).is_some_and(accept),
    _ => false,
  }
}

/// Runtime type tag of a resolved value.
pub fn type_tag(v: Option<&Value>) -> &'static str {
  match v {
    None => "undefined",
    Some(Value::Null) => "null",
    Some(Value::Bool(_)) => "boolean",
    Some(Value::Number(_)) => "number",
    Some(Value::String(_)) => "string",
    Some(Value::Array(_)) => "array",
    Some(Value::Object(_)) => "object",
  }
}

/// Truthiness in the usual scripting sense: undefined, null, false, 0, NaN and "" are falsy.
pub fn is_truthy(v: Option<&Value>) -> bool {
  match v {
    None | Some(Value::Null) => false,
    Some(Value::Bool(b)) => *b,
    Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
    Some(Value::String(s)) => !s.is_empty(),
    Some(Value::Array(_)) | Some(Value::Object(_)) => true,
  }
}

// ================================
// Equality
// ================================

fn eq(a: Option<&Value>, b: Option<&Value>) -> bool {
  option_equal(a, b)
}

fn neq(a: Option<&Value>, b: Option<&Value>) -> bool {
  !option_equal(a, b)
}

fn ieq(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (as_str(a), as_str(b)) {
    (Some(x), Some(y)) => x.to_lowercase() == y.to_lowercase(),
    _ => false,
  }
}

// ================================
// Ordering
// ================================

fn gt(a: Option<&Value>, b: Option<&Value>) -> bool {
  compare(a, b) == Some(Ordering::Greater)
}

fn gte(a: Option<&Value>, b: Option<&Value>) -> bool {
  matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}

fn lt(a: Option<&Value>, b: Option<&Value>) -> bool {
  compare(a, b) == Some(Ordering::Less)
}

fn lte(a: Option<&Value>, b: Option<&Value>) -> bool {
  matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
}

fn between(a: Option<&Value>, b: Option<&Value>) -> bool {
  match bounds(b) {
    Some((min, max)) => gte(a, Some(min)) && lte(a, Some(max)),
    None => false,
  }
}

fn not_between(a: Option<&Value>, b: Option<&Value>) -> bool {
  match bounds(b) {
    Some((min, max)) => lt(a, Some(min)) || gt(a, Some(max)),
    None => false,
  }
}

// ================================
// String
// ================================

fn contains(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (a, b) {
    (Some(Value::String(s)), Some(Value::String(t))) => s.contains(t.as_str()),
    (Some(Value::String(s)), Some(Value::Number(n))) => s.contains(&n.to_string()),
    (Some(Value::Array(items)), Some(needle)) => array_contains(items, needle),
    _ => false,
  }
}

fn not_contains(a: Option<&Value>, b: Option<&Value>) -> bool {
  !contains(a, b)
}

fn icontains(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (as_str(a), as_str(b)) {
    (Some(s), Some(t)) => s.to_lowercase().contains(&t.to_lowercase()),
    _ => false,
  }
}

fn starts_with(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (as_str(a), as_str(b)) {
    (Some(s), Some(t)) => s.starts_with(t),
    _ => false,
  }
}

fn ends_with(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (as_str(a), as_str(b)) {
    (Some(s), Some(t)) => s.ends_with(t),
    _ => false,
  }
}

/// Compiled patterns are kept up to this many; the cache is cleared when it fills up.
const REGEX_CACHE_CAPACITY: usize = 256;

/// Compiles `pattern` once. Invalid patterns are cached as `None`.
fn cached_regex(pattern: &str) -> Option<Regex> {
  static CACHE: OnceLock<Mutex<HashMap<String, Option<Regex>>>> = OnceLock::new();
  let mut cache = CACHE.get_or_init(|| Mutex::new(HashMap::new())).lock();
  if let Some(compiled) = cache.get(pattern) {
    return compiled.clone();
  }
  if cache.len() >= REGEX_CACHE_CAPACITY {
    cache.clear();
  }
  let compiled = Regex::new(pattern).ok();
  cache.insert(pattern.to_string(), compiled.clone());
  compiled
}

// An invalid pattern never matches.
fn regex_match(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (as_str(a), as_str(b)) {
    (Some(s), Some(pattern)) => cached_regex(pattern).is_some_and(|re| re.is_match(s)),
    _ => false,
  }
}

fn empty(a: Option<&Value>, _: Option<&Value>) -> bool {
  match a {
    None | Some(Value::Null) => true,
    Some(Value::String(s)) => s.is_empty(),
    Some(Value::Array(items)) => items.is_empty(),
    Some(Value::Object(map)) => map.is_empty(),
    _ => false,
  }
}

fn not_empty(a: Option<&Value>, b: Option<&Value>) -> bool {
  !empty(a, b)
}

fn is_upper_case(a: Option<&Value>, _: Option<&Value>) -> bool {
  as_str(a).is_some_and(|s| s == s.to_uppercase())
}

fn is_lower_case(a: Option<&Value>, _: Option<&Value>) -> bool {
  as_str(a).is_some_and(|s| s == s.to_lowercase())
}

fn iso_utc_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$").expect("ISO-8601 pattern is valid")
  })
}

/// `YYYY-MM-DDTHH:MM:SS[.fff]Z` and an actual calendar date/time.
fn is_date(a: Option<&Value>, _: Option<&Value>) -> bool {
  as_str(a).is_some_and(|s| iso_utc_pattern().is_match(s) && DateTime::parse_from_rfc3339(s).is_ok())
}

fn is_json(a: Option<&Value>, _: Option<&Value>) -> bool {
  as_str(a).is_some_and(|s| serde_json::from_str::<Value>(s).is_ok())
}

// ================================
// Membership
// ================================

fn is_in(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (a, b) {
    (Some(needle), Some(Value::Array(items))) => array_contains(items, needle),
    (Some(Value::String(needle)), Some(Value::String(haystack))) => haystack.contains(needle.as_str()),
    _ => false,
  }
}

fn not_in(a: Option<&Value>, b: Option<&Value>) -> bool {
  !is_in(a, b)
}

fn contains_all(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (a, b) {
    (Some(Value::Array(items)), Some(Value::Array(wanted))) => wanted.iter().all(|w| array_contains(items, w)),
    _ => false,
  }
}

fn contains_any(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (a, b) {
    (Some(Value::Array(items)), Some(Value::Array(wanted))) => wanted.iter().any(|w| array_contains(items, w)),
    _ => false,
  }
}

// Same length and every element of `a` present in `b`. Duplicate counts are not compared.
fn array_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (a, b) {
    (Some(Value::Array(xs)), Some(Value::Array(ys))) => xs.len() == ys.len() && xs.iter().all(|x| array_contains(ys, x)),
    _ => false,
  }
}

// ================================
// Type / nullness
// ================================

fn type_is(a: Option<&Value>, b: Option<&Value>) -> bool {
  as_str(b).is_some_and(|tag| tag == type_tag(a))
}

fn type_is_not(a: Option<&Value>, b: Option<&Value>) -> bool {
  as_str(b).is_some_and(|tag| tag != type_tag(a))
}

fn is_null(a: Option<&Value>, _: Option<&Value>) -> bool {
  matches!(a, Some(Value::Null))
}

fn not_null(a: Option<&Value>, _: Option<&Value>) -> bool {
  !matches!(a, Some(Value::Null))
}

fn defined(a: Option<&Value>, _: Option<&Value>) -> bool {
  a.is_some()
}

fn not_defined(a: Option<&Value>, _: Option<&Value>) -> bool {
  a.is_none()
}

fn truthy(a: Option<&Value>, _: Option<&Value>) -> bool {
  is_truthy(a)
}

fn falsy(a: Option<&Value>, _: Option<&Value>) -> bool {
  !is_truthy(a)
}

// ================================
// Length
// ================================

fn length_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
  compare_length(a, b, |o| o == Ordering::Equal)
}

fn length_gt(a: Option<&Value>, b: Option<&Value>) -> bool {
  compare_length(a, b, |o| o == Ordering::Greater)
}

fn length_gte(a: Option<&Value>, b: Option<&Value>) -> bool {
  compare_length(a, b, |o| o != Ordering::Less)
}

fn length_lt(a: Option<&Value>, b: Option<&Value>) -> bool {
  compare_length(a, b, |o| o == Ordering::Less)
}

fn length_lte(a: Option<&Value>, b: Option<&Value>) -> bool {
  compare_length(a, b, |o| o != Ordering::Greater)
}

// ================================
// Structural
// ================================

fn deep_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
  option_equal(a, b)
}

fn has_property(a: Option<&Value>, b: Option<&Value>) -> bool {
  match (a, as_str(b)) {
    (Some(Value::Object(map)), Some(key)) => map.contains_key(key),
    _ => false,
  }
}

/// Parses the left operand as JSON; an object compare value must match a subset of its fields.
fn json_subset(a: Option<&Value>, b: Option<&Value>) -> bool {
  let Some(parsed) = as_str(a).and_then(|s| serde_json::from_str::<Value>(s).ok()) else {
    return false;
  };
  match (&parsed, b) {
    (Value::Object(fields), Some(Value::Object(wanted))) => wanted
      .iter()
      .all(|(key, value)| fields.get(key).is_some_and(|field| values_equal(field, value))),
    (_, Some(expected)) => values_equal(&parsed, expected),
    (_, None) => false,
  }
}

// ================================
// Boolean
// ================================

fn is_true(a: Option<&Value>, _: Option<&Value>) -> bool {
  matches!(a, Some(Value::Bool(true)))
}

fn is_false(a: Option<&Value>, _: Option<&Value>) -> bool {
  matches!(a, Some(Value::Bool(false)))
}
