use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::Repository;

/// Is the given JSON value considered "set"?
///
/// `null`, `false`, zero, and empty strings, arrays, and objects are not; everything else is.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

// -------------------------------------------------------------------------------------------------
// PermissionIndex
// -------------------------------------------------------------------------------------------------
/// A mapping from repository full name to the names of the permissions granted on it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionIndex(BTreeMap<String, Vec<String>>);

impl PermissionIndex {
    pub fn get(&self, full_name: &str) -> Option<&[String]> {
        self.0.get(full_name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The full names of the repositories on which `permission` is granted, in sorted order.
    pub fn repos_with<'a>(&'a self, permission: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter()
            .filter(move |(_, perms)| perms.iter().any(|p| p == permission))
            .map(|(name, _)| name)
    }
}

impl From<BTreeMap<String, Vec<String>>> for PermissionIndex {
    fn from(index: BTreeMap<String, Vec<String>>) -> Self {
        PermissionIndex(index)
    }
}

/// Index the granted permissions of each repository by full name.
///
/// Permission names keep the order in which `gh` reported them.
/// If several records share a full name, the last one wins.
pub fn build_permission_index(repos: &[Repository]) -> PermissionIndex {
    let index = repos
        .iter()
        .map(|repo| {
            let granted: Vec<String> = repo
                .permissions
                .iter()
                .filter(|(_, value)| is_truthy(value))
                .map(|(name, _)| name.clone())
                .collect();
            (repo.full_name.clone(), granted)
        })
        .collect();
    PermissionIndex(index)
}
