use super::{or_zero, top_n_by, ChartSeries, Color, Dataset, DatasetStyle};
use crate::services::variability::{
    DurationDistributionResponse, VariabilityHeatmapResponse, VariabilityTrendResponse,
};

pub const TOP_VARIABILITY_CELLS: usize = 20;

/// Hour/distance-bin cells with the highest coefficient of variation.
pub fn top_variability(resp: &VariabilityHeatmapResponse, n: usize) -> ChartSeries {
    let top = top_n_by(&resp.data, n, |v| or_zero(v.coefficient_of_variation));
    ChartSeries {
        labels: top
            .iter()
            .map(|v| format!("{}:00 - {} mi", v.hour_of_day, v.distance_bin))
            .collect(),
        datasets: vec![Dataset::new(
            "Coefficient of Variation",
            top.iter().map(|v| or_zero(v.coefficient_of_variation)).collect(),
            DatasetStyle::solid(Color::Red),
        )],
    }
}

pub fn duration_by_hour(resp: &DurationDistributionResponse) -> ChartSeries {
    ChartSeries {
        labels: resp.data.iter().map(|d| format!("{}:00", d.hour_of_day)).collect(),
        datasets: vec![
            Dataset::new(
                "Mean Duration (minutes)",
                resp.data.iter().map(|d| or_zero(d.mean_duration)).collect(),
                DatasetStyle::line(Color::Blue).on_axis("y"),
            ),
            Dataset::new(
                "Std Deviation (minutes)",
                resp.data.iter().map(|d| or_zero(d.std_duration)).collect(),
                DatasetStyle::line(Color::Orange).on_axis("y1"),
            ),
        ],
    }
}

pub fn variability_trend(resp: &VariabilityTrendResponse) -> ChartSeries {
    ChartSeries {
        labels: resp
            .data
            .iter()
            .map(|t| format!("{} {}:00", t.date, t.hour_of_day))
            .collect(),
        datasets: vec![Dataset::new(
            "Coefficient of Variation",
            resp.data.iter().map(|t| or_zero(t.coefficient_of_variation)).collect(),
            DatasetStyle::line(Color::Purple),
        )],
    }
}
