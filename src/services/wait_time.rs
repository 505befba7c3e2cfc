use serde::{Deserialize, Serialize};

use super::whole_number;
use crate::api::{ApiClient, Params};
use crate::error::ApiError;
use crate::models::QueryResult;
use crate::query::QueryKey;

pub const DEFAULT_LEVER: &str = "vehicle_distribution";
pub const DEFAULT_REDUCTION_TARGET: f64 = 0.1;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WaitTimeData {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    pub hour: String,
    #[serde(default)]
    pub demand: Option<f64>,
    #[serde(default)]
    pub supply: Option<f64>,
    /// Demand/supply ratio. Null when a zone-hour had no dropoffs.
    #[serde(default)]
    pub wait_time_proxy: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WaitTimeSimulation {
    pub lever: String,
    #[serde(default)]
    pub reduction_target: Option<f64>,
    #[serde(default)]
    pub simulated_wait_time_reduction: Option<f64>,
    #[serde(default)]
    pub impact: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Lever {
    pub name: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub tradeoffs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WaitTimeTradeoffs {
    pub lever_1: Lever,
    pub lever_2: Lever,
}

pub type WaitTimeResponse = QueryResult<Vec<WaitTimeData>>;
pub type WaitTimeSimulationResponse = QueryResult<WaitTimeSimulation>;
pub type WaitTimeTradeoffsResponse = QueryResult<WaitTimeTradeoffs>;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulateParams {
    pub lever: String,
    pub reduction_target: f64,
}

impl Default for SimulateParams {
    fn default() -> Self {
        SimulateParams {
            lever: DEFAULT_LEVER.to_string(),
            reduction_target: DEFAULT_REDUCTION_TARGET,
        }
    }
}

pub fn current_key() -> QueryKey {
    QueryKey::new("wait-time-current")
}

pub fn simulate_key(params: &SimulateParams) -> QueryKey {
    QueryKey::new("wait-time-simulate")
        .param("lever", &params.lever)
        .param("reduction_target", params.reduction_target)
}

pub fn tradeoffs_key() -> QueryKey {
    QueryKey::new("wait-time-tradeoffs")
}

pub async fn get_current_wait_time(api: &ApiClient) -> Result<WaitTimeResponse, ApiError> {
    api.get(&super::path("/wait-time/current"), &Vec::new()).await
}

/// POST with the lever in the query string and no body.
pub async fn simulate_wait_time_reduction(
    api: &ApiClient,
    params: &SimulateParams,
) -> Result<WaitTimeSimulationResponse, ApiError> {
    let query: Params = vec![
        ("lever", params.lever.clone()),
        ("reduction_target", params.reduction_target.to_string()),
    ];
    api.post(&super::path("/wait-time/simulate"), None, &query).await
}

pub async fn get_wait_time_tradeoffs(api: &ApiClient) -> Result<WaitTimeTradeoffsResponse, ApiError> {
    api.get(&super::path("/wait-time/tradeoffs"), &Vec::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tradeoffs() {
        let parsed: WaitTimeTradeoffsResponse = serde_json::from_value(json!({
            "data": {
                "lever_1": {
                    "name": "Optimize vehicle distribution",
                    "benefits": ["Reduced wait time in high-demand zones"],
                    "tradeoffs": ["Increased wait time in low-demand zones"]
                },
                "lever_2": { "name": "Reduce minimum trip distance" }
            },
            "assumptions": {}
        }))
        .unwrap();
        assert_eq!(parsed.data.lever_1.benefits.len(), 1);
        assert!(parsed.data.lever_2.tradeoffs.is_empty());
    }

    #[test]
    fn test_simulate_key_tracks_lever() {
        let default = simulate_key(&SimulateParams::default());
        let other = simulate_key(&SimulateParams {
            lever: "minimum_distance".to_string(),
            ..Default::default()
        });
        assert_ne!(default, other);
        assert_eq!(
            default.to_string(),
            "wait-time-simulate(lever=vehicle_distribution,reduction_target=0.1)"
        );
    }
}
