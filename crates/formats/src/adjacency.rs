use std::collections::HashMap;

use foundation::ids::CountryId;
use serde_json::Value;
use tracing::warn;

/// Read-only country id -> neighbouring ids lookup.
///
/// Built once from the offline adjacency table. Ids without an entry have no
/// known neighbours; asking about them is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyGraph {
    neighbors: HashMap<CountryId, Vec<CountryId>>,
}

#[derive(Debug)]
pub enum AdjacencyError {
    Json(serde_json::Error),
    NotAnObject,
    InvalidKey(String),
    InvalidEntry { key: String, reason: String },
}

impl std::fmt::Display for AdjacencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjacencyError::Json(e) => write!(f, "adjacency JSON parse error: {e}"),
            AdjacencyError::NotAnObject => write!(f, "adjacency table must be a JSON object"),
            AdjacencyError::InvalidKey(k) => write!(f, "adjacency key is not a country id: {k}"),
            AdjacencyError::InvalidEntry { key, reason } => {
                write!(f, "invalid adjacency entry for {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for AdjacencyError {}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `{"<id>": [<id>, ...], ...}`.
    ///
    /// `null` neighbour entries (names the offline join could not resolve) are
    /// dropped.
    pub fn from_json_str(payload: &str) -> Result<Self, AdjacencyError> {
        let value: Value = serde_json::from_str(payload).map_err(AdjacencyError::Json)?;
        let obj = value.as_object().ok_or(AdjacencyError::NotAnObject)?;

        let mut graph = Self::new();
        for (key, list) in obj {
            let id: i64 = key
                .parse()
                .map_err(|_| AdjacencyError::InvalidKey(key.clone()))?;
            let arr = list.as_array().ok_or_else(|| AdjacencyError::InvalidEntry {
                key: key.clone(),
                reason: "neighbours must be an array".to_string(),
            })?;

            let mut ids = Vec::with_capacity(arr.len());
            for v in arr {
                match v {
                    Value::Null => continue,
                    Value::Number(n) => match n.as_i64() {
                        Some(n) => ids.push(CountryId(n)),
                        None => {
                            return Err(AdjacencyError::InvalidEntry {
                                key: key.clone(),
                                reason: format!("non-integer neighbour id {n}"),
                            });
                        }
                    },
                    other => {
                        return Err(AdjacencyError::InvalidEntry {
                            key: key.clone(),
                            reason: format!("unexpected neighbour value {other}"),
                        });
                    }
                }
            }
            graph.insert(CountryId(id), ids);
        }
        Ok(graph)
    }

    pub fn insert(&mut self, id: CountryId, neighbors: Vec<CountryId>) {
        self.neighbors.insert(id, neighbors);
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn contains(&self, id: CountryId) -> bool {
        self.neighbors.contains_key(&id)
    }

    /// Neighbours of `id` in table order; empty when the id has no entry.
    pub fn neighbors(&self, id: CountryId) -> &[CountryId] {
        self.neighbors.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if `other` is listed as a neighbour of `id`.
    ///
    /// A missing entry for `id` logs a warning and counts as "not adjacent".
    pub fn is_adjacent(&self, id: CountryId, other: CountryId) -> bool {
        match self.neighbors.get(&id) {
            Some(list) => list.contains(&other),
            None => {
                warn!(country = %id, "adjacency list not found; treating as no neighbours");
                false
            }
        }
    }
}

impl FromIterator<(CountryId, Vec<CountryId>)> for AdjacencyGraph {
    fn from_iter<I: IntoIterator<Item = (CountryId, Vec<CountryId>)>>(iter: I) -> Self {
        Self {
            neighbors: iter.into_iter().collect(),
        }
    }
}
