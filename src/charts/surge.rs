use super::{or_zero, top_n_by, zone_label, ChartSeries, Color, Dataset, DatasetStyle, Point, ScatterSeries};
use crate::services::surge::{SurgeCorrelationResponse, SurgeZoneResponse};

pub const TOP_SURGE_ZONES: usize = 10;
pub const TOP_SURGE_SHARE_ZONES: usize = 20;

pub fn surge_vs_revenue(resp: &SurgeCorrelationResponse) -> ScatterSeries {
    let points = resp
        .data
        .iter()
        .map(|z| Point {
            x: or_zero(z.avg_surge_events),
            y: or_zero(z.avg_daily_revenue),
        })
        .collect();
    ScatterSeries::single("Surge Events vs Daily Revenue", points, Color::Purple)
}

/// Zones with the most surge events per day, paired with their daily revenue.
pub fn top_surge_zones(resp: &SurgeCorrelationResponse, n: usize) -> ChartSeries {
    let top = top_n_by(&resp.data, n, |z| or_zero(z.avg_surge_events));
    ChartSeries {
        labels: top.iter().map(|z| zone_label(z.zone_id)).collect(),
        datasets: vec![
            Dataset::new(
                "Avg Surge Events",
                top.iter().map(|z| or_zero(z.avg_surge_events)).collect(),
                DatasetStyle::solid(Color::Orange),
            ),
            Dataset::new(
                "Avg Daily Revenue",
                top.iter().map(|z| or_zero(z.avg_daily_revenue)).collect(),
                DatasetStyle::solid(Color::Teal),
            ),
        ],
    }
}

/// Share of trips priced above the surge threshold, as a percentage.
pub fn surge_share(resp: &SurgeZoneResponse, n: usize) -> ChartSeries {
    let top = top_n_by(&resp.data, n, |z| or_zero(z.surge_percentage));
    ChartSeries {
        labels: top.iter().map(|z| zone_label(z.zone_id)).collect(),
        datasets: vec![Dataset::new(
            "Surge Trips %",
            top.iter().map(|z| or_zero(z.surge_percentage) * 100.0).collect(),
            DatasetStyle::solid(Color::Orange),
        )],
    }
}
