use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use insights::campaigns::{QueryParams, SortDirection, SortField, StatusFilter};
use insights::date_range::{DatePreset, DateSelection};
use insights::export::{ExportEngine, ExportKind};
use insights::handlers::{self, AppState};
use insights::models::{CampaignPage, CampaignStatus};
use insights::orchestrator::{DashboardEvent, DataFetchOrchestrator, ResourceKind};
use insights::source::{DataSource, MockSource, RemoteSource};

async fn spawn_server() -> String {
    let app = handlers::router(AppState::new(Arc::new(MockSource::new())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn remote(base: &str) -> RemoteSource {
    RemoteSource::new(&format!("{}/api", base), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn health_check_answers() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn remote_source_reads_every_endpoint() {
    let base = spawn_server().await;
    let source = remote(&base);

    let metrics = source.fetch_metrics(None).await.unwrap();
    assert_eq!(metrics.revenue.current, 142850.0);

    let charts = source.fetch_charts().await.unwrap();
    assert_eq!(charts.revenue.len(), 7);
    assert_eq!(charts.user_growth[6].new_users, 1520);
    assert_eq!(charts.traffic_sources[0].name, "Organic Search");

    let mut params = QueryParams::default();
    params.set_status_filter(StatusFilter::Only(CampaignStatus::Active));
    params.set_sort(Some(SortField::Roas), SortDirection::Desc);
    let page = source.fetch_campaigns(&params).await.unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.page, 1);
    let names: Vec<&str> = page.campaigns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Retargeting Excellence",
            "Summer Sale Campaign",
            "Mobile App Install",
            "Local Business Drive",
            "Brand Awareness Push",
        ]
    );
}

#[tokio::test]
async fn date_bounds_travel_over_the_wire() {
    let base = spawn_server().await;
    let source = remote(&base);

    let mut params = QueryParams::default();
    params.start_date = NaiveDate::from_ymd_opt(2024, 7, 1);
    params.end_date = NaiveDate::from_ymd_opt(2024, 7, 31);
    params.set_per_page(50);

    let remote_page = source.fetch_campaigns(&params).await.unwrap();
    let local_page = MockSource::new().fetch_campaigns(&params).await.unwrap();
    assert_eq!(remote_page, local_page);
}

#[tokio::test]
async fn malformed_queries_are_bad_requests() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    for query in [
        "status_filter=archived",
        "sort_by=colour",
        "sort_direction=sideways",
        "start_date=07%2F01%2F2024",
        "page=0",
        "per_page=abc",
    ] {
        let response = client
            .get(format!("{}/api/campaigns?{}", base, query))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "query {}", query);
    }

    let response = client
        .get(format!("{}/api/metrics?start_date=yesterday", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn post_search_matches_get() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let posted: CampaignPage = client
        .post(format!("{}/api/campaigns", base))
        .json(&json!({
            "search": "sale",
            "status_filter": "all",
            "page": 1,
            "per_page": 5,
            "sort_by": "budget",
            "sort_direction": "desc"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let fetched: CampaignPage = client
        .get(format!(
            "{}/api/campaigns?search=sale&sort_by=budget&sort_direction=desc",
            base
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(posted, fetched);
    assert!(posted
        .campaigns
        .iter()
        .all(|c| c.name.to_lowercase().contains("sale")));
}

#[tokio::test]
async fn campaign_json_uses_backend_field_names() {
    let base = spawn_server().await;
    let body: Value = reqwest::get(format!("{}/api/campaigns?per_page=1", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["total"], 8);
    assert_eq!(body["per_page"], 1);
    let first = &body["campaigns"][0];
    assert!(first["campaign_name"].is_string());
    assert!(first["start_date"].is_string());
}

#[tokio::test]
async fn orchestrator_loads_a_report_through_the_api() {
    let base = spawn_server().await;
    let source: Arc<dyn DataSource> = Arc::new(remote(&base));

    let mut dashboard = DataFetchOrchestrator::new(source)
        .with_date_selection(Some(DateSelection::Preset(DatePreset::AllTime)));
    dashboard.refresh_all();
    let events = dashboard.settle().await;

    assert_eq!(events.len(), 3);
    assert!(events.contains(&DashboardEvent::Loaded(ResourceKind::Metrics)));
    assert!(events.contains(&DashboardEvent::Loaded(ResourceKind::Charts)));
    assert!(events.contains(&DashboardEvent::Loaded(ResourceKind::Campaigns)));
    assert!(!dashboard.is_loading());

    let engine = ExportEngine::new(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
    let artifact = engine
        .export(ExportKind::Report, &dashboard.snapshot())
        .unwrap();
    assert_eq!(artifact.filename, "dashboard_report_2024-07-15.json");

    let report: Value = serde_json::from_slice(&artifact.body).unwrap();
    assert_eq!(report["summary"]["totalCampaigns"], 5);
    assert_eq!(report["summary"]["totalRevenue"], 142850.0);
}

#[tokio::test]
async fn unreachable_api_fails_the_dashboard() {
    let source: Arc<dyn DataSource> = Arc::new(
        RemoteSource::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap(),
    );

    let mut dashboard = DataFetchOrchestrator::new(source);
    dashboard.refresh_all();
    dashboard.settle().await;

    assert!(dashboard.is_failed());
    assert!(dashboard.first_error().is_some());
    assert!(ExportEngine::today()
        .export(ExportKind::Campaigns, &dashboard.snapshot())
        .is_err());
}
