use serde::{Deserialize, Serialize};

use super::whole_number;
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::QueryResult;
use crate::query::QueryKey;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VariabilityHeatmapCell {
    #[serde(deserialize_with = "whole_number")]
    pub hour_of_day: i64,
    pub distance_bin: String,
    #[serde(default)]
    pub trip_count: Option<f64>,
    #[serde(default)]
    pub mean_duration: Option<f64>,
    #[serde(default)]
    pub std_duration: Option<f64>,
    #[serde(default)]
    pub coefficient_of_variation: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DurationDistribution {
    #[serde(deserialize_with = "whole_number")]
    pub hour_of_day: i64,
    #[serde(default)]
    pub trip_count: Option<f64>,
    #[serde(default)]
    pub min_duration: Option<f64>,
    #[serde(default)]
    pub mean_duration: Option<f64>,
    #[serde(default)]
    pub max_duration: Option<f64>,
    #[serde(default)]
    pub std_duration: Option<f64>,
    #[serde(default)]
    pub p25_duration: Option<f64>,
    #[serde(default)]
    pub median_duration: Option<f64>,
    #[serde(default)]
    pub p75_duration: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VariabilityTrend {
    pub date: String,
    #[serde(deserialize_with = "whole_number")]
    pub hour_of_day: i64,
    #[serde(default)]
    pub trip_count: Option<f64>,
    #[serde(default)]
    pub mean_duration: Option<f64>,
    #[serde(default)]
    pub std_duration: Option<f64>,
    #[serde(default)]
    pub coefficient_of_variation: Option<f64>,
}

pub type VariabilityHeatmapResponse = QueryResult<Vec<VariabilityHeatmapCell>>;
pub type DurationDistributionResponse = QueryResult<Vec<DurationDistribution>>;
pub type VariabilityTrendResponse = QueryResult<Vec<VariabilityTrend>>;

pub fn heatmap_key() -> QueryKey {
    QueryKey::new("variability-heatmap")
}

pub fn distribution_key() -> QueryKey {
    QueryKey::new("duration-distribution")
}

pub fn trends_key() -> QueryKey {
    QueryKey::new("variability-trends")
}

pub async fn get_variability_heatmap(api: &ApiClient) -> Result<VariabilityHeatmapResponse, ApiError> {
    api.get(&super::path("/variability/heatmap"), &Vec::new()).await
}

pub async fn get_duration_distribution(
    api: &ApiClient,
) -> Result<DurationDistributionResponse, ApiError> {
    api.get(&super::path("/variability/distribution"), &Vec::new())
        .await
}

pub async fn get_variability_trends(api: &ApiClient) -> Result<VariabilityTrendResponse, ApiError> {
    api.get(&super::path("/variability/trends"), &Vec::new()).await
}
