use super::{or_zero, top_n_by, zone_label, ChartSeries, Color, Dataset, DatasetStyle};
use crate::services::congestion::{CongestionZoneResponse, ShortTripImpactResponse, ThroughputResponse};

pub const TOP_CONGESTION_ZONES: usize = 20;

pub fn top_congested_zones(resp: &CongestionZoneResponse, n: usize) -> ChartSeries {
    let top = top_n_by(&resp.data, n, |z| or_zero(z.congestion_index));
    ChartSeries {
        labels: top.iter().map(|z| zone_label(z.zone_id)).collect(),
        datasets: vec![Dataset::new(
            "Congestion Index (min/mile)",
            top.iter().map(|z| or_zero(z.congestion_index)).collect(),
            DatasetStyle::solid(Color::Red),
        )],
    }
}

/// Busiest zones with their trips-per-hour throughput on a second axis.
pub fn busiest_zone_throughput(resp: &ThroughputResponse, n: usize) -> ChartSeries {
    let top = top_n_by(&resp.data, n, |z| or_zero(z.trip_count));
    ChartSeries {
        labels: top.iter().map(|z| zone_label(z.zone_id)).collect(),
        datasets: vec![
            Dataset::new(
                "Trip Count",
                top.iter().map(|z| or_zero(z.trip_count)).collect(),
                DatasetStyle::solid(Color::Blue),
            ),
            Dataset::new(
                "Throughput (trips/hour)",
                top.iter().map(|z| or_zero(z.throughput_per_hour)).collect(),
                DatasetStyle::solid(Color::Teal).on_axis("y1"),
            ),
        ],
    }
}

pub fn short_trip_share(resp: &ShortTripImpactResponse, n: usize) -> ChartSeries {
    let top = top_n_by(&resp.data, n, |z| or_zero(z.short_trip_percentage));
    ChartSeries {
        labels: top.iter().map(|z| zone_label(z.zone_id)).collect(),
        datasets: vec![
            Dataset::new(
                "Short Trips %",
                top.iter()
                    .map(|z| or_zero(z.short_trip_percentage) * 100.0)
                    .collect(),
                DatasetStyle::solid(Color::Orange),
            ),
            Dataset::new(
                "Revenue per Trip ($)",
                top.iter().map(|z| or_zero(z.revenue_per_trip)).collect(),
                DatasetStyle::solid(Color::Purple).on_axis("y1"),
            ),
        ],
    }
}
