use serde::{Deserialize, Serialize};

use super::whole_number;
use crate::api::{ApiClient, Params};
use crate::error::ApiError;
use crate::models::QueryResult;
use crate::query::QueryKey;

/// Trips shorter than this many miles count as short trips.
pub const DEFAULT_SHORT_TRIP_THRESHOLD: f64 = 1.0;

/// Congestion index is average minutes per mile; higher means slower traffic.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CongestionZone {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(default)]
    pub trip_count: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
    #[serde(default)]
    pub avg_distance: Option<f64>,
    #[serde(default)]
    pub congestion_index: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ThroughputZone {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(default)]
    pub trip_count: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
    #[serde(default)]
    pub throughput_per_hour: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ShortTripImpact {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(default)]
    pub total_trips: Option<f64>,
    #[serde(default)]
    pub short_trips: Option<f64>,
    /// Fraction in `0..=1`.
    #[serde(default)]
    pub short_trip_percentage: Option<f64>,
    #[serde(default)]
    pub avg_distance: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub revenue_per_trip: Option<f64>,
}

pub type CongestionZoneResponse = QueryResult<Vec<CongestionZone>>;
pub type ThroughputResponse = QueryResult<Vec<ThroughputZone>>;
pub type ShortTripImpactResponse = QueryResult<Vec<ShortTripImpact>>;

pub fn zones_key() -> QueryKey {
    QueryKey::new("congestion-zones")
}

pub fn throughput_key() -> QueryKey {
    QueryKey::new("congestion-throughput")
}

pub fn short_trip_key(threshold: f64) -> QueryKey {
    QueryKey::new("short-trip-impact").param("short_trip_threshold", threshold)
}

pub async fn get_congestion_zones(api: &ApiClient) -> Result<CongestionZoneResponse, ApiError> {
    api.get(&super::path("/congestion/zones"), &Vec::new()).await
}

pub async fn get_throughput(api: &ApiClient) -> Result<ThroughputResponse, ApiError> {
    api.get(&super::path("/congestion/throughput"), &Vec::new()).await
}

pub async fn get_short_trip_impact(
    api: &ApiClient,
    threshold: f64,
) -> Result<ShortTripImpactResponse, ApiError> {
    let params: Params = vec![("short_trip_threshold", threshold.to_string())];
    api.get(&super::path("/congestion/short-trips"), &params).await
}
