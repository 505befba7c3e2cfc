//! Typed wrappers over the analytics endpoints. Each function issues exactly one
//! HTTP call and hands back the `{ data, assumptions }` envelope untouched.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod overview;
pub mod zones;
pub mod efficiency;
pub mod surge;
pub mod wait_time;
pub mod congestion;
pub mod incentives;
pub mod variability;
pub mod simulation;

pub const API_PREFIX: &str = "/api/v1";

/// Integer identifiers (zone ids, hours) sometimes arrive as `13.0` from the backend.
pub(crate) fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid integer {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.round() as i64)
            .map_err(|_| serde::de::Error::custom(format!("invalid integer '{}'", s))),
        other => Err(serde::de::Error::custom(format!("expected integer, got {}", other))),
    }
}

/// 0/1 flags, booleans, or null (treated as false).
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f == 1.0).unwrap_or(false),
        _ => false,
    })
}

pub(crate) fn path(suffix: &str) -> String {
    format!("{}{}", API_PREFIX, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "whole_number")]
        hour: i64,
        #[serde(default, deserialize_with = "flag")]
        marked: bool,
    }

    #[test]
    fn test_whole_number_accepts_floats_and_strings() {
        let row: Row = serde_json::from_value(json!({ "hour": 13.0, "marked": 1 })).unwrap();
        assert_eq!(row.hour, 13);
        assert!(row.marked);

        let row: Row = serde_json::from_value(json!({ "hour": "7" })).unwrap();
        assert_eq!(row.hour, 7);
        assert!(!row.marked);
    }

    #[test]
    fn test_flag_variants() {
        let row: Row = serde_json::from_value(json!({ "hour": 1, "marked": true })).unwrap();
        assert!(row.marked);
        let row: Row = serde_json::from_value(json!({ "hour": 1, "marked": null })).unwrap();
        assert!(!row.marked);
        let row: Row = serde_json::from_value(json!({ "hour": 1, "marked": 0 })).unwrap();
        assert!(!row.marked);
    }

    #[test]
    fn test_bad_integer_is_rejected() {
        let row: Result<Row, _> = serde_json::from_value(json!({ "hour": [1] }));
        assert!(row.is_err());
    }
}
