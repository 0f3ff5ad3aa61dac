use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Error, Result};

// -------------------------------------------------------------------------------------------------
// Identity
// -------------------------------------------------------------------------------------------------
/// The authenticated account, as reported by `gh api /user`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Identity(Map<String, Value>);

impl Identity {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Identity(fields)),
            _ => Err(Error::UnexpectedResponse {
                what: "identity",
                expected: "object",
            }),
        }
    }

    pub fn login(&self) -> Option<&str> {
        self.0.get("login")?.as_str()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

// -------------------------------------------------------------------------------------------------
// Repository
// -------------------------------------------------------------------------------------------------
/// One element of a repository listing.
///
/// Only `full_name` and `permissions` are interpreted; every other field is kept in `other`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Repository {
    pub full_name: String,

    #[serde(default)]
    pub permissions: Map<String, Value>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Repository {
    /// Decode a repository listing, which must be a JSON array of objects.
    pub fn list_from_value(value: Value) -> Result<Vec<Self>> {
        let items = match value {
            Value::Array(items) => items,
            _ => {
                return Err(Error::UnexpectedResponse {
                    what: "repository list",
                    expected: "array",
                })
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item)
                    .map_err(|source| Error::MalformedRepository { index, source })
            })
            .collect()
    }
}
