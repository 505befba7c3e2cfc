use std::collections::HashMap;

use super::{or_zero, zone_hour_label, ChartSeries, Color, Dataset, DatasetStyle, Point, ScatterSeries};
use crate::services::incentives::{
    DriverIncentiveResponse, IncentiveMisalignmentResponse, SystemEfficiencyResponse,
};

pub const SCATTER_SAMPLE: usize = 100;
pub const TOP_MISALIGNED: usize = 15;
pub const TOP_DRIVER_ZONES: usize = 10;

/// Driver score against the system score of the same zone-hour, for the first
/// `SCATTER_SAMPLE` driver rows. Zone-hours without a system row chart at y = 0.
pub fn driver_vs_system(
    driver: &DriverIncentiveResponse,
    system: &SystemEfficiencyResponse,
) -> ScatterSeries {
    let mut by_zone_hour: HashMap<(i64, i64), f64> = HashMap::new();
    for s in &system.data {
        by_zone_hour
            .entry((s.zone_id, s.hour_of_day))
            .or_insert_with(|| or_zero(s.system_efficiency_score));
    }

    let points = driver
        .data
        .iter()
        .take(SCATTER_SAMPLE)
        .map(|d| Point {
            x: or_zero(d.driver_incentive_score),
            y: by_zone_hour
                .get(&(d.zone_id, d.hour_of_day))
                .copied()
                .unwrap_or(0.0),
        })
        .collect();
    ScatterSeries::single("Driver Incentive vs System Efficiency", points, Color::Red)
}

pub fn misaligned_count(resp: &IncentiveMisalignmentResponse) -> usize {
    resp.data.iter().filter(|m| m.is_misaligned).count()
}

pub fn misaligned_zone_hours(resp: &IncentiveMisalignmentResponse, n: usize) -> ChartSeries {
    let rows: Vec<_> = resp.data.iter().filter(|m| m.is_misaligned).take(n).collect();
    ChartSeries {
        labels: rows
            .iter()
            .map(|m| zone_hour_label(m.zone_id, m.hour_of_day))
            .collect(),
        datasets: vec![
            Dataset::new(
                "Driver Score",
                rows.iter().map(|m| or_zero(m.driver_score)).collect(),
                DatasetStyle::solid(Color::Orange),
            ),
            Dataset::new(
                "System Score",
                rows.iter().map(|m| or_zero(m.system_score)).collect(),
                DatasetStyle::solid(Color::Teal),
            ),
        ],
    }
}

/// First `n` driver rows; the API already orders them by score.
pub fn top_driver_incentives(resp: &DriverIncentiveResponse, n: usize) -> ChartSeries {
    let rows: Vec<_> = resp.data.iter().take(n).collect();
    ChartSeries {
        labels: rows
            .iter()
            .map(|d| zone_hour_label(d.zone_id, d.hour_of_day))
            .collect(),
        datasets: vec![Dataset::new(
            "Driver Incentive Score",
            rows.iter().map(|d| or_zero(d.driver_incentive_score)).collect(),
            DatasetStyle::solid(Color::Purple),
        )],
    }
}
