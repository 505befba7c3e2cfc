use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use tlc_dashboard_lib::api::ApiClient;
use tlc_dashboard_lib::charts::surge::top_surge_zones;
use tlc_dashboard_lib::config::Config;
use tlc_dashboard_lib::pages::{PageAction, PageState, Section, Severity};
use tlc_dashboard_lib::query::{QueryClient, QueryOptions, RefetchTrigger};
use tlc_dashboard_lib::services::{simulation, surge, zones};
use tlc_dashboard_lib::shell::{Body, Dashboard, Screen};
use tlc_dashboard_lib::state::Fetch;

// ============================================================================
// FAKE ANALYTICS BACKEND
// ============================================================================

#[derive(Default)]
struct Backend {
    hits: Mutex<HashMap<&'static str, usize>>,
    overview_down: AtomicBool,
    simulate_down: AtomicBool,
}

impl Backend {
    fn hit(&self, name: &'static str) {
        *self.hits.lock().unwrap().entry(name).or_insert(0) += 1;
    }

    fn hits(&self, name: &str) -> usize {
        self.hits.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    fn total(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

type Shared = Arc<Backend>;
type Params = Query<HashMap<String, String>>;

fn param(params: &HashMap<String, String>, key: &str, default: f64) -> f64 {
    params.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

async fn overview(State(backend): State<Shared>) -> Response {
    backend.hit("overview");
    if backend.overview_down.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    Json(json!({
        "data": {
            "total_trips": 1250000, "start_date": "2025-01-01", "end_date": "2025-04-30",
            "zone_count": 263, "total_revenue": 34567890.12
        },
        "assumptions": { "data_source": "NYC TLC Yellow Taxi Trip Records" }
    }))
    .into_response()
}

async fn zone_revenue(State(backend): State<Shared>, Query(params): Params) -> Json<Value> {
    backend.hit("zone-revenue");
    let limit = param(&params, "limit", 20.0) as usize;
    let rows: Vec<Value> = (0..limit.min(30))
        .map(|i| {
            json!({
                "zone_id": 100 + i,
                "trip_count": 5000 - i * 10,
                "total_revenue": 100000.0 - i as f64 * 1000.0,
                "total_tips": 9000.0,
                "total_amount": 120000.0,
                "avg_fare": 18.5,
                "avg_distance": 3.2,
                "avg_duration_minutes": 14.0
            })
        })
        .collect();
    // Slow enough for concurrent callers to overlap
    tokio::time::sleep(Duration::from_millis(50)).await;
    Json(json!({ "data": rows, "assumptions": { "limit": limit } }))
}

async fn net_profit(State(backend): State<Shared>) -> Json<Value> {
    backend.hit("zone-net-profit");
    Json(json!({
        "data": [
            { "zone_id": 132, "trip_count": 900, "gross_revenue": 45000.0, "avg_duration_minutes": 40.0, "net_profit": -1200.5 },
            { "zone_id": 161, "trip_count": 1200, "gross_revenue": 30000.0, "avg_duration_minutes": 12.0, "net_profit": 8000.0 }
        ],
        "assumptions": { "idle_cost_per_hour": 30.0 }
    }))
}

async fn negative_zones(State(backend): State<Shared>) -> Json<Value> {
    backend.hit("negative-zones");
    Json(json!({
        "data": [
            { "zone_id": 132, "trip_count": 900, "gross_revenue": 45000.0, "avg_duration_minutes": 40.0, "net_profit": -1200.5 }
        ],
        "assumptions": {}
    }))
}

async fn surge_correlation(State(backend): State<Shared>) -> Json<Value> {
    backend.hit("surge-correlation");
    let rows: Vec<Value> = (0..15)
        .map(|i| {
            json!({
                "zone_id": i + 1,
                "avg_surge_events": ((i * 7) % 11) as f64 / 2.0,
                "avg_daily_revenue": 2000.0 - i as f64 * 50.0,
                "days_with_data": 120
            })
        })
        .collect();
    Json(json!({ "data": rows, "assumptions": { "surge_threshold": "20% above median fare" } }))
}

async fn min_distance(State(backend): State<Shared>, Query(params): Params) -> Json<Value> {
    backend.hit("min-distance");
    let threshold = param(&params, "threshold", 1.0);
    let before_trips = 1_000_000.0;
    let removed = (120_000.0 * threshold).round();
    Json(json!({
        "data": {
            "threshold_miles": threshold,
            "before": {
                "total_trips": before_trips, "total_revenue": 18500000.0,
                "avg_duration_minutes": 14.2, "trips_below_threshold": removed
            },
            "after": {
                "total_trips": before_trips - removed, "total_revenue": 17900000.0,
                "avg_duration_minutes": 15.7
            },
            "impact": {
                "trips_removed": removed,
                "trips_removed_percentage": 100.0 * removed / before_trips,
                "revenue_impact": -600000.0,
                "revenue_impact_percentage": -3.24,
                "avg_duration_change": 1.5
            }
        },
        "assumptions": { "limitations": ["Assumes removed trips are not replaced", "Ignores rider substitution"] }
    }))
}

async fn sensitivity(State(backend): State<Shared>) -> Json<Value> {
    backend.hit("sensitivity");
    let rows: Vec<Value> = [0.5, 1.0, 1.5, 2.0]
        .iter()
        .map(|t| {
            json!({
                "threshold": t, "total_trips": 1000000, "trips_removed": 120000.0 * t,
                "trips_removed_percentage": 12.0 * t, "revenue_before": 18500000.0,
                "revenue_after": 18000000.0, "revenue_impact_percentage": -3.0 * t
            })
        })
        .collect();
    Json(json!({ "data": rows, "assumptions": {} }))
}

async fn wait_time_current(State(backend): State<Shared>) -> Json<Value> {
    backend.hit("wait-time-current");
    Json(json!({
        "data": [
            { "zone_id": 236, "hour": "2025-01-03 18:00:00", "demand": 120, "supply": 40, "wait_time_proxy": 3.0 }
        ],
        "assumptions": { "wait_time_proxy": "Demand/Supply ratio" }
    }))
}

async fn wait_time_tradeoffs(State(backend): State<Shared>) -> Json<Value> {
    backend.hit("wait-time-tradeoffs");
    Json(json!({
        "data": {
            "lever_1": { "name": "Vehicle distribution", "benefits": ["Shorter waits in busy zones"], "tradeoffs": ["Longer waits at the edges"] },
            "lever_2": { "name": "Minimum trip distance", "benefits": ["Faster turnover"], "tradeoffs": ["Lower revenue per trip"] }
        },
        "assumptions": {}
    }))
}

async fn wait_time_simulate(State(backend): State<Shared>, Query(params): Params) -> Response {
    backend.hit("wait-time-simulate");
    if backend.simulate_down.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "simulation offline").into_response();
    }
    let lever = params.get("lever").cloned().unwrap_or_default();
    Json(json!({
        "data": {
            "lever": lever, "reduction_target": param(&params, "reduction_target", 0.1),
            "simulated_wait_time_reduction": 0.1, "impact": "Estimated impact"
        },
        "assumptions": {}
    }))
    .into_response()
}

async fn surge_events(State(backend): State<Shared>) -> Json<Value> {
    backend.hit("surge-events");
    Json(json!({
        "data": [
            {
                "tpep_pickup_datetime": "2025-01-03 18:22:00", "zone_id": 161,
                "fare_amount": 31.0, "median_fare": 14.2, "is_surge": 1
            },
            {
                "tpep_pickup_datetime": "2025-01-03 18:40:00", "zone_id": 236,
                "fare_amount": 12.0, "median_fare": 14.2, "is_surge": 0
            }
        ],
        "assumptions": { "surge_threshold": "20.0% above median fare" }
    }))
}

async fn spawn_backend() -> (SocketAddr, Shared) {
    let backend: Shared = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/v1/overview", get(overview))
        .route("/api/v1/zones/revenue", get(zone_revenue))
        .route("/api/v1/zones/net-profit", get(net_profit))
        .route("/api/v1/zones/negative-zones", get(negative_zones))
        .route("/api/v1/surge/events", get(surge_events))
        .route("/api/v1/surge/correlation", get(surge_correlation))
        .route("/api/v1/simulation/min-distance", get(min_distance))
        .route("/api/v1/simulation/results", get(min_distance))
        .route("/api/v1/simulation/sensitivity", get(sensitivity))
        .route("/api/v1/wait-time/current", get(wait_time_current))
        .route("/api/v1/wait-time/tradeoffs", get(wait_time_tradeoffs))
        .route("/api/v1/wait-time/simulate", post(wait_time_simulate))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, backend)
}

fn config_for(addr: SocketAddr) -> Config {
    Config {
        origin: format!("http://{}", addr),
        ..Config::default()
    }
}

fn sections(screen: &Screen) -> &[Section] {
    match &screen.body {
        Body::Page(PageState::Ready(view)) => &view.sections,
        other => panic!("expected a ready page, got {:?}", other),
    }
}

// ============================================================================
// END-TO-END SCENARIOS
// ============================================================================

#[tokio::test]
async fn test_zone_revenue_respects_limit() {
    let (addr, _backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(addr));

    let resp = zones::get_zone_revenue(&api, 5).await.unwrap();
    assert!(resp.data.len() <= 5);
    for zone in &resp.data {
        assert!(zone.trip_count.is_some());
        assert!(zone.total_revenue.is_some());
    }
}

#[tokio::test]
async fn test_surge_top_entry_is_maximum() {
    let (addr, _backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(addr));

    let resp = surge::get_surge_correlation(&api, 0.2).await.unwrap();
    let top = top_surge_zones(&resp, resp.data.len());
    let events = &top.datasets[0].values;
    assert!(events.iter().all(|e| events[0] >= *e));
}

#[tokio::test]
async fn test_simulation_percentage_is_consistent() {
    let (addr, _backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(addr));

    let resp = simulation::simulate_min_distance(&api, 1.0).await.unwrap();
    let impact = &resp.data.impact;
    let expected = 100.0 * impact.trips_removed.unwrap() / resp.data.before.total_trips.unwrap();
    assert!((impact.trips_removed_percentage.unwrap() - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_unknown_path_issues_no_requests() {
    let (addr, backend) = spawn_backend().await;
    let mut dashboard = Dashboard::new(&config_for(addr));

    let screen = dashboard.navigate("/does-not-exist").await.unwrap();
    assert_eq!(screen.body, Body::NotFound("/does-not-exist".to_string()));
    assert_eq!(backend.total(), 0);
}

// ============================================================================
// CACHE BEHAVIOR
// ============================================================================

#[tokio::test]
async fn test_concurrent_queries_share_one_request() {
    let (addr, backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(addr));
    let queries = QueryClient::new(Duration::from_secs(300));

    let fetch = |api: ApiClient| {
        let queries = queries.clone();
        async move {
            queries
                .fetch(zones::revenue_key(5), QueryOptions::default(), move || {
                    let api = api.clone();
                    async move { zones::get_zone_revenue(&api, 5).await }
                })
                .await
        }
    };
    let (a, b) = tokio::join!(fetch(api.clone()), fetch(api.clone()));

    assert_eq!(a.unwrap().data, b.unwrap().data);
    assert_eq!(backend.hits("zone-revenue"), 1);
}

#[tokio::test]
async fn test_revisiting_a_page_uses_the_cache() {
    let (addr, backend) = spawn_backend().await;
    let mut dashboard = Dashboard::new(&config_for(addr));

    let first = dashboard.navigate("/question1").await.unwrap();
    assert!(sections(&first)
        .iter()
        .any(|s| matches!(s, Section::Bullets { title, .. } if title == "Zones That Become Net Negative")));

    dashboard.navigate("/").await.unwrap();
    dashboard.navigate("/question1").await.unwrap();
    assert_eq!(backend.hits("zone-revenue"), 1);
    assert_eq!(backend.hits("zone-net-profit"), 1);
}

#[tokio::test]
async fn test_reconnect_refetches_but_focus_does_not() {
    let (addr, backend) = spawn_backend().await;
    let mut dashboard = Dashboard::new(&config_for(addr));
    dashboard.navigate("/question1").await.unwrap();

    assert!(dashboard.notify(RefetchTrigger::WindowFocus).await.unwrap().is_none());
    assert_eq!(backend.hits("zone-revenue"), 1);

    let screen = dashboard.notify(RefetchTrigger::Reconnect).await.unwrap();
    assert!(screen.is_some());
    assert_eq!(backend.hits("zone-revenue"), 2);
}

// ============================================================================
// PAGE STATES
// ============================================================================

#[tokio::test]
async fn test_overview_failure_shows_error_and_hint() {
    let (addr, backend) = spawn_backend().await;
    backend.overview_down.store(true, Ordering::SeqCst);
    let mut dashboard = Dashboard::new(&config_for(addr));

    let screen = dashboard.navigate("/").await.unwrap();
    match screen.body {
        Body::Page(PageState::Failed { heading, message, hint }) => {
            assert_eq!(heading, "Error loading overview data");
            assert!(message.contains("500"));
            assert!(message.contains("database unavailable"));
            assert_eq!(
                hint,
                format!("Please ensure the backend API is running at http://{}", addr)
            );
        }
        other => panic!("expected failure, got {:?}", other),
    }
    // First attempt plus two retries
    assert_eq!(backend.hits("overview"), 3);
}

#[tokio::test]
async fn test_overview_cards() {
    let (addr, _backend) = spawn_backend().await;
    let mut dashboard = Dashboard::new(&config_for(addr));

    let screen = dashboard.navigate("/").await.unwrap();
    let cards = sections(&screen)
        .iter()
        .find_map(|s| match s {
            Section::Cards(cards) => Some(cards.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(cards[0].value, "1,250,000");
    assert_eq!(cards[3].value, "01/01/2025 - 04/30/2025");
}

#[tokio::test]
async fn test_simulation_runs_only_on_explicit_run() {
    let (addr, backend) = spawn_backend().await;
    let mut dashboard = Dashboard::new(&config_for(addr));

    dashboard.navigate("/question8").await.unwrap();
    assert_eq!(backend.hits("sensitivity"), 1);
    assert_eq!(backend.hits("min-distance"), 0);

    dashboard.apply(PageAction::SetThreshold(2.0)).await.unwrap();
    assert_eq!(backend.hits("min-distance"), 0);

    let screen = dashboard.apply(PageAction::Run).await.unwrap().unwrap();
    assert_eq!(backend.hits("min-distance"), 1);
    assert!(sections(&screen).iter().any(|s| matches!(
        s,
        Section::Bar { title, .. } if title == "Before/After Comparison (Threshold: 2 miles)"
    )));
    assert!(sections(&screen).iter().any(|s| matches!(
        s,
        Section::Alert { severity: Severity::Warning, lines, .. } if lines.len() == 2
    )));
}

#[tokio::test]
async fn test_failed_post_is_not_retried() {
    let (addr, backend) = spawn_backend().await;
    backend.simulate_down.store(true, Ordering::SeqCst);
    let mut dashboard = Dashboard::new(&config_for(addr));

    dashboard.navigate("/question4").await.unwrap();
    assert_eq!(backend.hits("wait-time-simulate"), 0);

    let screen = dashboard.apply(PageAction::Run).await.unwrap().unwrap();
    assert_eq!(backend.hits("wait-time-simulate"), 1);
    assert!(sections(&screen).iter().any(|s| matches!(
        s,
        Section::Alert { title: Some(title), .. } if title == "Simulation failed"
    )));

    // Reconnect re-renders the page but keeps the failure
    let screen = dashboard.notify(RefetchTrigger::Reconnect).await.unwrap().unwrap();
    assert_eq!(backend.hits("wait-time-simulate"), 1);
    assert!(sections(&screen).iter().any(|s| matches!(
        s,
        Section::Alert { title: Some(title), .. } if title == "Simulation failed"
    )));

    // Running again is an explicit resend
    backend.simulate_down.store(false, Ordering::SeqCst);
    dashboard.apply(PageAction::Run).await.unwrap();
    assert_eq!(backend.hits("wait-time-simulate"), 2);
}

#[tokio::test]
async fn test_reconnect_does_not_resend_simulation() {
    let (addr, backend) = spawn_backend().await;
    let mut dashboard = Dashboard::new(&config_for(addr));

    dashboard.navigate("/question4").await.unwrap();
    let screen = dashboard.apply(PageAction::Run).await.unwrap().unwrap();
    assert_eq!(backend.hits("wait-time-simulate"), 1);
    assert!(sections(&screen).iter().any(|s| matches!(
        s,
        Section::Alert { title: Some(title), .. } if title == "Simulated Reduction"
    )));

    // The GET queries on the page still refetch
    let screen = dashboard.notify(RefetchTrigger::Reconnect).await.unwrap();
    assert!(screen.is_some());
    assert_eq!(backend.hits("wait-time-current"), 2);
    assert_eq!(backend.hits("wait-time-simulate"), 1);
}

#[tokio::test]
async fn test_background_open_shows_loading_then_settles() {
    let (addr, backend) = spawn_backend().await;
    let mut dashboard = Dashboard::new(&config_for(addr));

    let first = dashboard.open("/question1", Fetch::Background).await.unwrap();
    assert!(first.is_loading());

    let settled = dashboard.refresh(Fetch::Wait).await.unwrap().unwrap();
    assert!(!settled.is_loading());
    assert!(sections(&settled)
        .iter()
        .any(|s| matches!(s, Section::Bar { title, .. } if title == "Top 20 Zones by Revenue")));
    assert_eq!(backend.hits("zone-revenue"), 1);

    // Cached now, so a background open renders straight away
    let again = dashboard.open("/question1", Fetch::Background).await.unwrap();
    assert!(!again.is_loading());
    assert_eq!(backend.hits("zone-revenue"), 1);
}

#[tokio::test]
async fn test_reconnect_on_another_page_skips_render() {
    let (addr, backend) = spawn_backend().await;
    let mut dashboard = Dashboard::new(&config_for(addr));

    dashboard.navigate("/question1").await.unwrap();
    dashboard.navigate("/assumptions").await.unwrap();

    assert!(dashboard.notify(RefetchTrigger::Reconnect).await.unwrap().is_none());
    assert_eq!(backend.hits("zone-revenue"), 1);

    // The marked query refetches once its page is shown again
    dashboard.navigate("/question1").await.unwrap();
    assert_eq!(backend.hits("zone-revenue"), 2);
}

#[tokio::test]
async fn test_surge_events_and_simulation_results() {
    let (addr, _backend) = spawn_backend().await;
    let api = ApiClient::new(&config_for(addr));

    let events = surge::get_surge_events(&api, 0.2).await.unwrap();
    assert_eq!(events.data.len(), 2);
    assert!(events.data[0].is_surge);
    assert!(!events.data[1].is_surge);

    let results = simulation::get_simulation_results(&api, 0.5).await.unwrap();
    assert_eq!(results.data.threshold_miles, Some(0.5));
    assert_eq!(results.data.impact.trips_removed, Some(60_000.0));
}
