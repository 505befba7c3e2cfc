use super::{group_thousands, or_zero, ChartSeries, Color, Dataset, DatasetStyle};
use crate::services::simulation::{SensitivityResponse, SimulationResult};

pub const METRIC_LABELS: [&str; 3] = ["Total Trips", "Total Revenue", "Avg Duration (min)"];

pub fn before_after(result: &SimulationResult) -> ChartSeries {
    ChartSeries {
        labels: METRIC_LABELS.iter().map(|l| l.to_string()).collect(),
        datasets: vec![
            Dataset::new(
                "Before",
                vec![
                    or_zero(result.before.total_trips),
                    or_zero(result.before.total_revenue),
                    or_zero(result.before.avg_duration_minutes),
                ],
                DatasetStyle::solid(Color::Blue),
            ),
            Dataset::new(
                "After",
                vec![
                    or_zero(result.after.total_trips),
                    or_zero(result.after.total_revenue),
                    or_zero(result.after.avg_duration_minutes),
                ],
                DatasetStyle::solid(Color::Red),
            ),
        ],
    }
}

/// Trip and revenue loss across the fixed threshold grid.
pub fn sensitivity(resp: &SensitivityResponse) -> ChartSeries {
    ChartSeries {
        labels: resp
            .data
            .iter()
            .map(|s| format!("{} mi", s.threshold))
            .collect(),
        datasets: vec![
            Dataset::new(
                "Trips Removed %",
                resp.data.iter().map(|s| or_zero(s.trips_removed_percentage)).collect(),
                DatasetStyle::line(Color::Red),
            ),
            Dataset::new(
                "Revenue Impact %",
                resp.data.iter().map(|s| or_zero(s.revenue_impact_percentage)).collect(),
                DatasetStyle::line(Color::Teal),
            ),
        ],
    }
}

pub fn impact_summary(result: &SimulationResult) -> Vec<String> {
    let impact = &result.impact;
    vec![
        format!(
            "Trips Removed: {} ({:.2}%)",
            group_thousands(or_zero(impact.trips_removed)),
            or_zero(impact.trips_removed_percentage)
        ),
        format!(
            "Revenue Impact: ${} ({:.2}%)",
            group_thousands(or_zero(impact.revenue_impact)),
            or_zero(impact.revenue_impact_percentage)
        ),
        format!(
            "Duration Change: {:.2} minutes",
            or_zero(impact.avg_duration_change)
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result() -> SimulationResult {
        serde_json::from_value(json!({
            "threshold_miles": 1.0,
            "before": { "total_trips": 1000000, "total_revenue": 18500000.5, "avg_duration_minutes": 14.2, "trips_below_threshold": 120000 },
            "after": { "total_trips": 880000, "total_revenue": 17900000.0, "avg_duration_minutes": null },
            "impact": {
                "trips_removed": 120000,
                "trips_removed_percentage": 12.0,
                "revenue_impact": -600000.5,
                "revenue_impact_percentage": -3.243,
                "avg_duration_change": 1.5
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_before_after_order() {
        let series = before_after(&result());
        assert_eq!(series.labels, vec!["Total Trips", "Total Revenue", "Avg Duration (min)"]);
        assert_eq!(series.datasets[0].values, vec![1000000.0, 18500000.5, 14.2]);
        assert_eq!(series.datasets[1].values[2], 0.0);
        assert_eq!(series.datasets[1].style.color, Color::Red);
    }

    #[test]
    fn test_sensitivity_labels() {
        let resp: SensitivityResponse = serde_json::from_value(json!({
            "data": [
                { "threshold": 0.5, "trips_removed_percentage": 4.0, "revenue_impact_percentage": -1.0 },
                { "threshold": 1.0, "trips_removed_percentage": 12.0, "revenue_impact_percentage": -3.2 },
                { "threshold": 1.5, "trips_removed_percentage": null, "revenue_impact_percentage": -5.0 },
                { "threshold": 2.0, "trips_removed_percentage": 30.0, "revenue_impact_percentage": -9.0 }
            ],
            "assumptions": {}
        }))
        .unwrap();
        let series = sensitivity(&resp);
        assert_eq!(series.labels, vec!["0.5 mi", "1 mi", "1.5 mi", "2 mi"]);
        assert_eq!(series.datasets[0].values, vec![4.0, 12.0, 0.0, 30.0]);
    }

    #[test]
    fn test_impact_summary() {
        let lines = impact_summary(&result());
        assert_eq!(lines[0], "Trips Removed: 120,000 (12.00%)");
        assert_eq!(lines[1], "Revenue Impact: $-600,001 (-3.24%)");
        assert_eq!(lines[2], "Duration Change: 1.50 minutes");
    }
}
