use serde::{Deserialize, Serialize};

use super::{flag, whole_number};
use crate::api::{ApiClient, Params};
use crate::error::ApiError;
use crate::models::QueryResult;
use crate::query::QueryKey;

/// Fraction above the zone median fare that counts as a surge.
pub const DEFAULT_SURGE_THRESHOLD: f64 = 0.2;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SurgeEvent {
    pub tpep_pickup_datetime: String,
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(default)]
    pub fare_amount: Option<f64>,
    #[serde(default)]
    pub median_fare: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    pub is_surge: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SurgeCorrelation {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(default)]
    pub avg_surge_events: Option<f64>,
    #[serde(default)]
    pub avg_daily_revenue: Option<f64>,
    #[serde(default)]
    pub days_with_data: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SurgeZone {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(default)]
    pub total_trips: Option<f64>,
    #[serde(default)]
    pub surge_trips: Option<f64>,
    #[serde(default)]
    pub surge_percentage: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
}

pub type SurgeEventResponse = QueryResult<Vec<SurgeEvent>>;
pub type SurgeCorrelationResponse = QueryResult<Vec<SurgeCorrelation>>;
pub type SurgeZoneResponse = QueryResult<Vec<SurgeZone>>;

fn threshold_params(threshold: f64) -> Params {
    vec![("threshold", threshold.to_string())]
}

pub fn events_key(threshold: f64) -> QueryKey {
    QueryKey::new("surge-events").param("threshold", threshold)
}

pub fn correlation_key(threshold: f64) -> QueryKey {
    QueryKey::new("surge-correlation").param("threshold", threshold)
}

pub fn zones_key(threshold: f64) -> QueryKey {
    QueryKey::new("surge-zones").param("threshold", threshold)
}

pub async fn get_surge_events(api: &ApiClient, threshold: f64) -> Result<SurgeEventResponse, ApiError> {
    api.get(&super::path("/surge/events"), &threshold_params(threshold))
        .await
}

/// Surge frequency against average daily revenue, per zone.
pub async fn get_surge_correlation(
    api: &ApiClient,
    threshold: f64,
) -> Result<SurgeCorrelationResponse, ApiError> {
    api.get(&super::path("/surge/correlation"), &threshold_params(threshold))
        .await
}

pub async fn get_surge_zones(api: &ApiClient, threshold: f64) -> Result<SurgeZoneResponse, ApiError> {
    api.get(&super::path("/surge/zones"), &threshold_params(threshold))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_events() {
        let parsed: SurgeEventResponse = serde_json::from_value(json!({
            "data": [
                {
                    "tpep_pickup_datetime": "2025-01-03 18:22:00", "zone_id": 161,
                    "fare_amount": 31.0, "median_fare": 14.2, "is_surge": 1
                }
            ],
            "assumptions": { "surge_threshold": "20.0% above median fare" }
        }))
        .unwrap();
        assert!(parsed.data[0].is_surge);
        assert_eq!(parsed.data[0].median_fare, Some(14.2));
    }

    #[test]
    fn test_keys_are_distinct_per_endpoint() {
        assert_ne!(events_key(0.2), correlation_key(0.2));
        assert_ne!(events_key(0.2), zones_key(0.2));
        assert_ne!(events_key(0.2), events_key(0.3));
        assert_eq!(events_key(0.2).to_string(), "surge-events(threshold=0.2)");
    }
}
