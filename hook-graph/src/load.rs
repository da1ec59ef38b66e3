//! Parsing of the `data.users` array.
use crate::types::User;
use hook_common::{HookError, Result};
use serde::Deserialize;
use serde_json::Value;

/// Read every element of `raw` as a [`User`], in order.
///
/// Followed ids are not checked against the loaded set; dangling ids simply
/// never pair up.
///
/// ```
/// use hook_graph::{load_users, User};
///
/// let raw = serde_json::json!([{"id": 1, "follows": [2]}, {"id": 2, "follows": []}]);
/// let users = load_users(&raw).unwrap();
/// assert_eq!(users, vec![User::new(1, vec![2]), User::new(2, vec![])]);
/// ```
pub fn load_users(raw: &Value) -> Result<Vec<User>> {
    let items = raw
        .as_array()
        .ok_or_else(|| HookError::Malformed(format!("users must be an array, got {}", kind(raw))))?;

    let users = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            User::deserialize(item).map_err(|e| HookError::Malformed(format!("users[{idx}]: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let edges: usize = users.iter().map(|u| u.follows.len()).sum();
    tracing::debug!(users = users.len(), edges, "graph.loaded");
    Ok(users)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
