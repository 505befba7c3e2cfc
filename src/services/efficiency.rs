use serde::{Deserialize, Serialize};

use super::whole_number;
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::QueryResult;
use crate::query::QueryKey;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EfficiencyTimeSeries {
    pub hour: String,
    #[serde(default)]
    pub total_trips: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
    #[serde(default)]
    pub efficiency: Option<f64>,
}

/// Revenue per vehicle hour for one weekday/hour cell. `day_of_week` 0 is Sunday.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EfficiencyHeatmapCell {
    #[serde(deserialize_with = "whole_number")]
    pub day_of_week: i64,
    #[serde(deserialize_with = "whole_number")]
    pub hour_of_day: i64,
    #[serde(default)]
    pub total_trips: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub efficiency: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DemandEfficiency {
    pub hour: String,
    #[serde(default)]
    pub demand_trips: Option<f64>,
    #[serde(default)]
    pub efficiency: Option<f64>,
}

pub type EfficiencyTimeSeriesResponse = QueryResult<Vec<EfficiencyTimeSeries>>;
pub type EfficiencyHeatmapResponse = QueryResult<Vec<EfficiencyHeatmapCell>>;
pub type DemandEfficiencyResponse = QueryResult<Vec<DemandEfficiency>>;

pub fn timeseries_key() -> QueryKey {
    QueryKey::new("efficiency-timeseries")
}

pub fn heatmap_key() -> QueryKey {
    QueryKey::new("efficiency-heatmap")
}

pub fn demand_correlation_key() -> QueryKey {
    QueryKey::new("demand-efficiency-correlation")
}

pub async fn get_efficiency_timeseries(api: &ApiClient) -> Result<EfficiencyTimeSeriesResponse, ApiError> {
    api.get(&super::path("/efficiency/timeseries"), &Vec::new()).await
}

pub async fn get_efficiency_heatmap(api: &ApiClient) -> Result<EfficiencyHeatmapResponse, ApiError> {
    api.get(&super::path("/efficiency/heatmap"), &Vec::new()).await
}

pub async fn get_demand_efficiency_correlation(
    api: &ApiClient,
) -> Result<DemandEfficiencyResponse, ApiError> {
    api.get(&super::path("/efficiency/demand-correlation"), &Vec::new())
        .await
}
