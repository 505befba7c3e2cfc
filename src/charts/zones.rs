use super::{or_zero, zone_label, ChartSeries, Color, Dataset, DatasetStyle, Point, ScatterSeries};
use crate::services::zones::{ZoneNetProfitResponse, ZoneRevenueResponse};

pub fn revenue_bar(resp: &ZoneRevenueResponse) -> ChartSeries {
    ChartSeries {
        labels: resp.data.iter().map(|z| zone_label(z.zone_id)).collect(),
        datasets: vec![Dataset::new(
            "Total Revenue",
            resp.data.iter().map(|z| or_zero(z.total_revenue)).collect(),
            DatasetStyle::solid(Color::Blue),
        )],
    }
}

/// Gross revenue on x, net profit after idle and empty-return costs on y.
pub fn revenue_vs_net_profit(resp: &ZoneNetProfitResponse) -> ScatterSeries {
    let points = resp
        .data
        .iter()
        .map(|z| Point {
            x: or_zero(z.gross_revenue),
            y: or_zero(z.net_profit),
        })
        .collect();
    ScatterSeries::single("Revenue vs Net Profit", points, Color::Red)
}

pub fn negative_zone_lines(resp: &ZoneNetProfitResponse) -> Vec<String> {
    resp.data
        .iter()
        .map(|z| {
            format!(
                "Zone {}: Net Profit = ${:.2} (Gross Revenue: ${:.2})",
                z.zone_id,
                or_zero(z.net_profit),
                or_zero(z.gross_revenue)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn revenue() -> ZoneRevenueResponse {
        serde_json::from_value(json!({
            "data": [
                { "zone_id": 132, "trip_count": 100, "total_revenue": 5000.0 },
                { "zone_id": 138, "trip_count": 80, "total_revenue": null }
            ],
            "assumptions": {}
        }))
        .unwrap()
    }

    fn net_profit() -> ZoneNetProfitResponse {
        serde_json::from_value(json!({
            "data": [
                { "zone_id": 1, "gross_revenue": 1200.5, "net_profit": -30.25 },
                { "zone_id": 2, "gross_revenue": null, "net_profit": null }
            ],
            "assumptions": { "idle_cost_per_hour": 30.0 }
        }))
        .unwrap()
    }

    #[test]
    fn test_revenue_bar_coalesces_nulls() {
        let series = revenue_bar(&revenue());
        assert_eq!(series.labels, vec!["Zone 132", "Zone 138"]);
        assert_eq!(series.datasets[0].values, vec![5000.0, 0.0]);
        assert_eq!(series, revenue_bar(&revenue()));
    }

    #[test]
    fn test_scatter_and_lines() {
        let scatter = revenue_vs_net_profit(&net_profit());
        assert_eq!(scatter.datasets[0].points[0], Point { x: 1200.5, y: -30.25 });
        assert_eq!(scatter.datasets[0].points[1], Point { x: 0.0, y: 0.0 });

        let lines = negative_zone_lines(&net_profit());
        assert_eq!(lines[0], "Zone 1: Net Profit = $-30.25 (Gross Revenue: $1200.50)");
    }
}
