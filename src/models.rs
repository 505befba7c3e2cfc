use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata the API attaches to every payload. Passed through unchanged.
pub type Assumptions = Map<String, Value>;

/// The `{ data, assumptions }` envelope returned by every analytics endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub data: T,
    #[serde(default)]
    pub assumptions: Assumptions,
}

impl<T> QueryResult<T> {
    /// Look up an assumption rendered as display text.
    pub fn assumption_text(&self, key: &str) -> Option<String> {
        self.assumptions.get(key).map(value_text)
    }

    /// Assumption rendered as text, or `fallback` when the API did not supply it.
    pub fn assumption_or(&self, key: &str, fallback: &str) -> String {
        self.assumption_text(key)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// String entries of a list-valued assumption (e.g. simulation limitations).
    pub fn assumption_list(&self, key: &str) -> Vec<String> {
        match self.assumptions.get(key) {
            Some(Value::Array(items)) => items.iter().map(value_text).collect(),
            Some(other) => vec![value_text(other)],
            None => Vec::new(),
        }
    }
}

/// Strings without quotes, everything else as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
