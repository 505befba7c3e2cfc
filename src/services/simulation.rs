use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, Params};
use crate::error::ApiError;
use crate::models::QueryResult;
use crate::query::QueryKey;

pub const DEFAULT_MIN_DISTANCE: f64 = 1.0;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct BeforeMetrics {
    #[serde(default)]
    pub total_trips: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
    #[serde(default)]
    pub trips_below_threshold: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AfterMetrics {
    #[serde(default)]
    pub total_trips: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ImpactMetrics {
    #[serde(default)]
    pub trips_removed: Option<f64>,
    #[serde(default)]
    pub trips_removed_percentage: Option<f64>,
    #[serde(default)]
    pub revenue_impact: Option<f64>,
    #[serde(default)]
    pub revenue_impact_percentage: Option<f64>,
    #[serde(default)]
    pub avg_duration_change: Option<f64>,
}

/// Static removal of every trip shorter than `threshold_miles`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimulationResult {
    #[serde(default)]
    pub threshold_miles: Option<f64>,
    #[serde(default)]
    pub before: BeforeMetrics,
    #[serde(default)]
    pub after: AfterMetrics,
    #[serde(default)]
    pub impact: ImpactMetrics,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SensitivityResult {
    pub threshold: f64,
    #[serde(default)]
    pub total_trips: Option<f64>,
    #[serde(default)]
    pub trips_removed: Option<f64>,
    #[serde(default)]
    pub trips_removed_percentage: Option<f64>,
    #[serde(default)]
    pub revenue_before: Option<f64>,
    #[serde(default)]
    pub revenue_after: Option<f64>,
    #[serde(default)]
    pub revenue_impact_percentage: Option<f64>,
}

pub type SimulationResponse = QueryResult<SimulationResult>;
pub type SensitivityResponse = QueryResult<Vec<SensitivityResult>>;

pub fn min_distance_key(threshold: f64) -> QueryKey {
    QueryKey::new("simulation").param("threshold", threshold)
}

pub fn results_key(threshold: f64) -> QueryKey {
    QueryKey::new("simulation-results").param("threshold", threshold)
}

pub fn sensitivity_key() -> QueryKey {
    QueryKey::new("sensitivity-analysis")
}

pub async fn simulate_min_distance(api: &ApiClient, threshold: f64) -> Result<SimulationResponse, ApiError> {
    let params: Params = vec![("threshold", threshold.to_string())];
    api.get(&super::path("/simulation/min-distance"), &params).await
}

/// Same payload as `simulate_min_distance`, served from the backend's results endpoint.
pub async fn get_simulation_results(api: &ApiClient, threshold: f64) -> Result<SimulationResponse, ApiError> {
    let params: Params = vec![("threshold", threshold.to_string())];
    api.get(&super::path("/simulation/results"), &params).await
}

pub async fn get_sensitivity_analysis(api: &ApiClient) -> Result<SensitivityResponse, ApiError> {
    api.get(&super::path("/simulation/sensitivity"), &Vec::new()).await
}
