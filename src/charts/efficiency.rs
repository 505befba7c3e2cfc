use super::{hour_label, or_zero, ChartSeries, Color, Dataset, DatasetStyle, HeatmapGrid, Point, ScatterSeries};
use crate::services::efficiency::{
    DemandEfficiencyResponse, EfficiencyHeatmapResponse, EfficiencyTimeSeriesResponse,
};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Trip volume on the left axis, revenue per vehicle hour on the right.
pub fn trips_vs_efficiency(resp: &EfficiencyTimeSeriesResponse) -> ChartSeries {
    ChartSeries {
        labels: resp.data.iter().map(|d| hour_label(&d.hour)).collect(),
        datasets: vec![
            Dataset::new(
                "Total Trips",
                resp.data.iter().map(|d| or_zero(d.total_trips)).collect(),
                DatasetStyle::line(Color::Blue).on_axis("y"),
            ),
            Dataset::new(
                "System Efficiency",
                resp.data.iter().map(|d| or_zero(d.efficiency)).collect(),
                DatasetStyle::line(Color::Red).on_axis("y1"),
            ),
        ],
    }
}

pub fn demand_vs_efficiency(resp: &DemandEfficiencyResponse) -> ScatterSeries {
    let points = resp
        .data
        .iter()
        .map(|d| Point {
            x: or_zero(d.demand_trips),
            y: or_zero(d.efficiency),
        })
        .collect();
    ScatterSeries::single("Demand vs Efficiency", points, Color::Teal)
}

/// Weekday rows by hour columns. Missing cells stay 0; out-of-range cells are dropped.
pub fn efficiency_heatmap(resp: &EfficiencyHeatmapResponse) -> HeatmapGrid {
    let mut cells = vec![vec![0.0; 24]; 7];
    for cell in &resp.data {
        let (day, hour) = (cell.day_of_week, cell.hour_of_day);
        if (0..7).contains(&day) && (0..24).contains(&hour) {
            cells[day as usize][hour as usize] = or_zero(cell.efficiency);
        }
    }
    HeatmapGrid {
        row_labels: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
        column_labels: (0..24).map(|h| format!("{}:00", h)).collect(),
        cells,
    }
}
