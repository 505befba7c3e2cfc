use super::{hour_label, or_zero, top_n_by, ChartSeries, Color, Dataset, DatasetStyle};
use crate::services::wait_time::{Lever, WaitTimeResponse, WaitTimeSimulationResponse};

pub const TOP_WAIT_TIME_ZONES: usize = 20;

/// Zone-hours with the highest demand/supply ratio.
pub fn top_wait_time_zones(resp: &WaitTimeResponse, n: usize) -> ChartSeries {
    let top = top_n_by(&resp.data, n, |w| or_zero(w.wait_time_proxy));
    ChartSeries {
        labels: top
            .iter()
            .map(|w| format!("Zone {} @ {}", w.zone_id, hour_label(&w.hour)))
            .collect(),
        datasets: vec![
            Dataset::new(
                "Wait Time Proxy (demand/supply)",
                top.iter().map(|w| or_zero(w.wait_time_proxy)).collect(),
                DatasetStyle::solid(Color::Orange),
            ),
            Dataset::new(
                "Demand (pickups)",
                top.iter().map(|w| or_zero(w.demand)).collect(),
                DatasetStyle::solid(Color::Blue).on_axis("y1"),
            ),
        ],
    }
}

pub fn lever_lines(lever: &Lever) -> Vec<String> {
    let mut lines = Vec::with_capacity(lever.benefits.len() + lever.tradeoffs.len());
    lines.extend(lever.benefits.iter().map(|b| format!("Benefit: {}", b)));
    lines.extend(lever.tradeoffs.iter().map(|t| format!("Trade-off: {}", t)));
    lines
}

pub fn simulation_lines(resp: &WaitTimeSimulationResponse) -> Vec<String> {
    let sim = &resp.data;
    vec![
        format!("Lever: {}", sim.lever),
        format!("Reduction target: {:.0}%", or_zero(sim.reduction_target) * 100.0),
        format!(
            "Simulated wait time reduction: {:.0}%",
            or_zero(sim.simulated_wait_time_reduction) * 100.0
        ),
        format!("Impact: {}", sim.impact),
    ]
}
