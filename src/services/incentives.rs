use serde::{Deserialize, Serialize};

use super::{flag, whole_number};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::QueryResult;
use crate::query::QueryKey;

/// Earnings per minute of trip time for a zone-hour, from the driver's point of view.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DriverIncentive {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(deserialize_with = "whole_number")]
    pub hour_of_day: i64,
    #[serde(default)]
    pub trip_count: Option<f64>,
    #[serde(default)]
    pub avg_earnings_per_trip: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
    #[serde(default)]
    pub driver_incentive_score: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SystemEfficiency {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(deserialize_with = "whole_number")]
    pub hour_of_day: i64,
    #[serde(default)]
    pub trip_count: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
    #[serde(default)]
    pub system_efficiency_score: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IncentiveMisalignment {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(deserialize_with = "whole_number")]
    pub hour_of_day: i64,
    #[serde(default)]
    pub driver_score: Option<f64>,
    #[serde(default)]
    pub system_score: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    pub is_misaligned: bool,
}

pub type DriverIncentiveResponse = QueryResult<Vec<DriverIncentive>>;
pub type SystemEfficiencyResponse = QueryResult<Vec<SystemEfficiency>>;
pub type IncentiveMisalignmentResponse = QueryResult<Vec<IncentiveMisalignment>>;

pub fn driver_key() -> QueryKey {
    QueryKey::new("driver-incentives")
}

pub fn system_key() -> QueryKey {
    QueryKey::new("system-efficiency")
}

pub fn misalignment_key() -> QueryKey {
    QueryKey::new("incentive-misalignment")
}

pub async fn get_driver_incentives(api: &ApiClient) -> Result<DriverIncentiveResponse, ApiError> {
    api.get(&super::path("/incentives/driver"), &Vec::new()).await
}

pub async fn get_system_efficiency(api: &ApiClient) -> Result<SystemEfficiencyResponse, ApiError> {
    api.get(&super::path("/incentives/system"), &Vec::new()).await
}

pub async fn get_incentive_misalignment(
    api: &ApiClient,
) -> Result<IncentiveMisalignmentResponse, ApiError> {
    api.get(&super::path("/incentives/misalignment"), &Vec::new())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_misalignment_flags() {
        let parsed: IncentiveMisalignmentResponse = serde_json::from_value(json!({
            "data": [
                { "zone_id": 132, "hour_of_day": 5, "driver_score": 2.4, "system_score": 0.3, "is_misaligned": 1 },
                { "zone_id": 48, "hour_of_day": 17, "driver_score": 1.1, "system_score": 1.9, "is_misaligned": 0 }
            ],
            "assumptions": { "threshold": "Top 25% driver, bottom 50% system" }
        }))
        .unwrap();
        assert!(parsed.data[0].is_misaligned);
        assert!(!parsed.data[1].is_misaligned);
    }
}
