use serde::{Deserialize, Serialize};

use super::whole_number;
use crate::api::{ApiClient, Params};
use crate::error::ApiError;
use crate::models::QueryResult;
use crate::query::QueryKey;

pub const DEFAULT_REVENUE_LIMIT: u32 = 20;
pub const DEFAULT_IDLE_COST_PER_HOUR: f64 = 30.0;
pub const DEFAULT_EMPTY_RETURN_COST_MULTIPLIER: f64 = 0.5;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ZoneRevenue {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(default)]
    pub trip_count: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub total_tips: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub avg_fare: Option<f64>,
    #[serde(default)]
    pub avg_distance: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ZoneNetProfit {
    #[serde(deserialize_with = "whole_number")]
    pub zone_id: i64,
    #[serde(default)]
    pub trip_count: Option<f64>,
    #[serde(default)]
    pub gross_revenue: Option<f64>,
    #[serde(default)]
    pub avg_duration_minutes: Option<f64>,
    #[serde(default)]
    pub net_profit: Option<f64>,
}

pub type ZoneRevenueResponse = QueryResult<Vec<ZoneRevenue>>;
pub type ZoneNetProfitResponse = QueryResult<Vec<ZoneNetProfit>>;

/// Cost model sent to the net-profit endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetProfitParams {
    pub idle_cost_per_hour: f64,
    pub empty_return_cost_multiplier: f64,
}

impl Default for NetProfitParams {
    fn default() -> Self {
        NetProfitParams {
            idle_cost_per_hour: DEFAULT_IDLE_COST_PER_HOUR,
            empty_return_cost_multiplier: DEFAULT_EMPTY_RETURN_COST_MULTIPLIER,
        }
    }
}

pub fn revenue_key(limit: u32) -> QueryKey {
    QueryKey::new("zone-revenue").param("limit", limit)
}

pub fn net_profit_key(params: &NetProfitParams) -> QueryKey {
    QueryKey::new("zone-net-profit")
        .param("idle_cost_per_hour", params.idle_cost_per_hour)
        .param("empty_return_cost_multiplier", params.empty_return_cost_multiplier)
}

pub fn negative_zones_key(idle_cost_per_hour: f64) -> QueryKey {
    QueryKey::new("negative-zones").param("idle_cost_per_hour", idle_cost_per_hour)
}

/// Top zones by revenue.
pub async fn get_zone_revenue(api: &ApiClient, limit: u32) -> Result<ZoneRevenueResponse, ApiError> {
    let params: Params = vec![("limit", limit.to_string())];
    api.get(&super::path("/zones/revenue"), &params).await
}

pub async fn get_zone_net_profit(
    api: &ApiClient,
    params: &NetProfitParams,
) -> Result<ZoneNetProfitResponse, ApiError> {
    let query: Params = vec![
        ("idle_cost_per_hour", params.idle_cost_per_hour.to_string()),
        (
            "empty_return_cost_multiplier",
            params.empty_return_cost_multiplier.to_string(),
        ),
    ];
    api.get(&super::path("/zones/net-profit"), &query).await
}

/// Zones whose net profit turns negative once idle costs are charged.
pub async fn get_negative_zones(
    api: &ApiClient,
    idle_cost_per_hour: f64,
) -> Result<ZoneNetProfitResponse, ApiError> {
    let params: Params = vec![("idle_cost_per_hour", idle_cost_per_hour.to_string())];
    api.get(&super::path("/zones/negative-zones"), &params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_revenue_rows() {
        let parsed: ZoneRevenueResponse = serde_json::from_value(json!({
            "data": [
                {
                    "zone_id": 132, "trip_count": 51234, "total_revenue": 3456789.5,
                    "total_tips": 400000.0, "total_amount": 3900000.0, "avg_fare": 62.1,
                    "avg_distance": 17.3, "avg_duration_minutes": 38.2
                },
                { "zone_id": 138.0, "trip_count": 40000, "total_revenue": null }
            ],
            "assumptions": { "limit": 20 }
        }))
        .unwrap();

        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].zone_id, 132);
        assert_eq!(parsed.data[1].zone_id, 138);
        assert!(parsed.data[1].total_revenue.is_none());
        assert!(parsed.data[1].avg_fare.is_none());
    }

    #[test]
    fn test_keys_follow_parameters() {
        assert_eq!(revenue_key(20), revenue_key(DEFAULT_REVENUE_LIMIT));
        assert_ne!(revenue_key(5), revenue_key(20));
        assert_ne!(
            net_profit_key(&NetProfitParams::default()),
            net_profit_key(&NetProfitParams {
                idle_cost_per_hour: 45.0,
                ..Default::default()
            })
        );
    }
}
