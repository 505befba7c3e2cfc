use std::time::Instant;

use tlc_dashboard_lib::api::ApiClient;
use tlc_dashboard_lib::config::{self, Config};
use tlc_dashboard_lib::error::ApiError;
use tlc_dashboard_lib::models::QueryResult;
use tlc_dashboard_lib::services::{
    congestion, efficiency, incentives, overview, simulation, surge, variability, wait_time, zones,
};

const ENDPOINTS: [&str; 24] = [
    "/overview",
    "/zones/revenue",
    "/zones/net-profit",
    "/zones/negative-zones",
    "/efficiency/timeseries",
    "/efficiency/heatmap",
    "/efficiency/demand-correlation",
    "/surge/events",
    "/surge/correlation",
    "/surge/zones",
    "/wait-time/current",
    "/wait-time/tradeoffs",
    "/congestion/zones",
    "/congestion/throughput",
    "/congestion/short-trips",
    "/incentives/driver",
    "/incentives/system",
    "/incentives/misalignment",
    "/variability/heatmap",
    "/variability/distribution",
    "/variability/trends",
    "/simulation/min-distance",
    "/simulation/results",
    "/simulation/sensitivity",
];

fn rows<T>(resp: QueryResult<Vec<T>>) -> String {
    format!("{} rows", resp.data.len())
}

/// Call the typed getter behind `endpoint` and summarize the decoded payload.
async fn probe(api: &ApiClient, endpoint: &str) -> Result<String, ApiError> {
    match endpoint {
        "/overview" => overview::get_overview(api)
            .await
            .map(|r| format!("{} assumptions", r.assumptions.len())),
        "/zones/revenue" => zones::get_zone_revenue(api, zones::DEFAULT_REVENUE_LIMIT).await.map(rows),
        "/zones/net-profit" => zones::get_zone_net_profit(api, &zones::NetProfitParams::default())
            .await
            .map(rows),
        "/zones/negative-zones" => zones::get_negative_zones(api, zones::DEFAULT_IDLE_COST_PER_HOUR)
            .await
            .map(rows),
        "/efficiency/timeseries" => efficiency::get_efficiency_timeseries(api).await.map(rows),
        "/efficiency/heatmap" => efficiency::get_efficiency_heatmap(api).await.map(rows),
        "/efficiency/demand-correlation" => {
            efficiency::get_demand_efficiency_correlation(api).await.map(rows)
        }
        "/surge/events" => surge::get_surge_events(api, surge::DEFAULT_SURGE_THRESHOLD).await.map(rows),
        "/surge/correlation" => surge::get_surge_correlation(api, surge::DEFAULT_SURGE_THRESHOLD)
            .await
            .map(rows),
        "/surge/zones" => surge::get_surge_zones(api, surge::DEFAULT_SURGE_THRESHOLD).await.map(rows),
        "/wait-time/current" => wait_time::get_current_wait_time(api).await.map(rows),
        "/wait-time/tradeoffs" => wait_time::get_wait_time_tradeoffs(api)
            .await
            .map(|r| format!("levers: {}, {}", r.data.lever_1.name, r.data.lever_2.name)),
        "/congestion/zones" => congestion::get_congestion_zones(api).await.map(rows),
        "/congestion/throughput" => congestion::get_throughput(api).await.map(rows),
        "/congestion/short-trips" => {
            congestion::get_short_trip_impact(api, congestion::DEFAULT_SHORT_TRIP_THRESHOLD)
                .await
                .map(rows)
        }
        "/incentives/driver" => incentives::get_driver_incentives(api).await.map(rows),
        "/incentives/system" => incentives::get_system_efficiency(api).await.map(rows),
        "/incentives/misalignment" => incentives::get_incentive_misalignment(api).await.map(rows),
        "/variability/heatmap" => variability::get_variability_heatmap(api).await.map(rows),
        "/variability/distribution" => variability::get_duration_distribution(api).await.map(rows),
        "/variability/trends" => variability::get_variability_trends(api).await.map(rows),
        "/simulation/min-distance" => simulation::simulate_min_distance(api, simulation::DEFAULT_MIN_DISTANCE)
            .await
            .map(|r| format!("{:?} trips removed", r.data.impact.trips_removed)),
        "/simulation/results" => simulation::get_simulation_results(api, simulation::DEFAULT_MIN_DISTANCE)
            .await
            .map(|r| format!("{:?} trips removed", r.data.impact.trips_removed)),
        "/simulation/sensitivity" => simulation::get_sensitivity_analysis(api).await.map(rows),
        other => Err(ApiError::Setup(format!("no probe for {}", other))),
    }
}

#[tokio::main]
async fn main() {
    let dotenv = config::load_dotenv();
    tlc_dashboard_lib::init_tracing();
    if let Err(e) = dotenv {
        tracing::debug!("No .env file loaded: {}", e);
    }
    let config = Config::from_env();
    let api = ApiClient::new(&config);

    println!("🔍 Probing analytics API at {}", api.backend_location());
    println!("\n{:<35} | {:<8} | {:<10} | {}", "Endpoint", "Status", "Time", "Payload");
    println!("{}", "-".repeat(80));

    let mut failures = 0;
    for endpoint in ENDPOINTS {
        let started = Instant::now();
        let result = probe(&api, endpoint).await;
        let elapsed = format!("{}ms", started.elapsed().as_millis());

        match result {
            Ok(summary) => println!("{:<35} | {:<8} | {:<10} | {}", endpoint, "OK", elapsed, summary),
            Err(e) => {
                failures += 1;
                let status = e
                    .status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "ERR".to_string());
                println!("{:<35} | {:<8} | {:<10} | {}", endpoint, status, elapsed, e);
            }
        }
    }

    println!("{}", "-".repeat(80));
    if failures == 0 {
        println!("✅ All endpoints responded");
    } else {
        println!("❌ {} endpoint(s) failed", failures);
        std::process::exit(1);
    }
}
