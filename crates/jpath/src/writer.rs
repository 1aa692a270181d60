//! Builds the output tree by writing values at destination paths.
//!
//! Missing intermediates are created on the way down: objects for key
//! segments, arrays for index and append segments. `null` counts as missing.
use crate::ast::{JsonPath, MAX_INDEX, PathSegment};
use crate::error::JPathError;
use serde_json::{Map, Value};

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn conflict(path: &JsonPath, message: String) -> JPathError {
    JPathError::PathConflict {
        path: path.to_string(),
        message,
    }
}

fn step_into<'v>(current: &'v mut Value, segment: &PathSegment) -> Result<&'v mut Value, String> {
    if current.is_null() {
        *current = match segment {
            PathSegment::Key(_) => Value::Object(Map::new()),
            PathSegment::Index(_) | PathSegment::Append => Value::Array(Vec::new()),
        };
    }
    match (segment, current) {
        (PathSegment::Key(key), Value::Object(map)) => {
            Ok(map.entry(key.clone()).or_insert(Value::Null))
        }
        (PathSegment::Index(index), Value::Array(items)) => {
            if items.len() <= *index {
                let len = index
                    .checked_add(1)
                    .filter(|len| *len <= MAX_INDEX + 1)
                    .ok_or_else(|| {
                        format!("index {} exceeds the maximum of {}", index, MAX_INDEX)
                    })?;
                items.resize(len, Value::Null);
            }
            Ok(&mut items[*index])
        }
        (PathSegment::Append, Value::Array(items)) => {
            let index = items.len();
            items.push(Value::Null);
            Ok(&mut items[index])
        }
        (PathSegment::Key(key), other) => Err(format!(
            "cannot use key '{}' on {}",
            key,
            kind(other)
        )),
        (_, other) => Err(format!("cannot index into {}", kind(other))),
    }
}

/// Walks `path` below `scope`, creating what is missing, and returns the
/// slot the path addresses.
fn navigate<'v>(scope: &'v mut Value, path: &JsonPath) -> Result<&'v mut Value, JPathError> {
    let mut current = scope;
    for segment in &path.segments {
        current = step_into(current, segment).map_err(|message| conflict(path, message))?;
    }
    Ok(current)
}

fn merge_objects(existing: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match (existing.get_mut(&key), value) {
            (Some(Value::Object(inner)), Value::Object(nested)) => merge_objects(inner, nested),
            (Some(slot), value) => *slot = value,
            (None, value) => {
                existing.insert(key, value);
            }
        }
    }
}

/// Places `value` into an addressed slot. Objects merge into objects, arrays
/// replace arrays and scalars replace scalars; anything else is a conflict.
fn assign(slot: &mut Value, value: Value) -> Result<(), String> {
    match slot {
        Value::Object(existing) => match value {
            Value::Object(incoming) => {
                merge_objects(existing, incoming);
                Ok(())
            }
            other => Err(format!("cannot replace an object with {}", kind(&other))),
        },
        Value::Array(existing) => match value {
            Value::Array(incoming) => {
                *existing = incoming;
                Ok(())
            }
            other => Err(format!("cannot replace an array with {}", kind(&other))),
        },
        _ => {
            *slot = value;
            Ok(())
        }
    }
}

/// Writes `value` at `path` relative to `scope`.
pub fn write(scope: &mut Value, path: &JsonPath, value: Value) -> Result<(), JPathError> {
    let slot = navigate(scope, path)?;
    assign(slot, value).map_err(|message| conflict(path, message))
}

/// Makes sure an array exists at `path` and returns it. An existing array is
/// kept as is, so repeated sequences into one path accumulate.
pub fn ensure_array<'v>(
    scope: &'v mut Value,
    path: &JsonPath,
) -> Result<&'v mut Vec<Value>, JPathError> {
    let slot = navigate(scope, path)?;
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => Ok(items),
        other => Err(conflict(
            path,
            format!("expected an array, found {}", kind(other)),
        )),
    }
}

/// Appends `value` to the array at `path`, creating the array if needed.
pub fn append(scope: &mut Value, path: &JsonPath, value: Value) -> Result<(), JPathError> {
    ensure_array(scope, path)?.push(value);
    Ok(())
}

/// Reads the value at `path`. Append segments never address anything.
pub fn get<'v>(scope: &'v Value, path: &JsonPath) -> Option<&'v Value> {
    path.segments
        .iter()
        .try_fold(scope, |current, segment| match segment {
            PathSegment::Key(key) => current.get(key.as_str()),
            PathSegment::Index(index) => current.get(*index),
            PathSegment::Append => None,
        })
}
