use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::QueryResult;
use crate::query::QueryKey;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OverviewData {
    #[serde(default)]
    pub total_trips: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub zone_count: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
}

pub type OverviewResponse = QueryResult<OverviewData>;

pub fn overview_key() -> QueryKey {
    QueryKey::new("overview")
}

pub async fn get_overview(api: &ApiClient) -> Result<OverviewResponse, ApiError> {
    api.get(&super::path("/overview"), &Vec::new()).await
}
