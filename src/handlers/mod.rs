use axum::{http::StatusCode, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::{FetchError, QueryError};
use crate::source::DataSource;

pub mod campaigns;
pub mod charts;
pub mod metrics;

pub use campaigns::*;
pub use charts::*;
pub use metrics::*;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }
}

/// The analytics API under `/api`, plus `/health`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/metrics", get(get_metrics))
        .route("/charts/revenue", get(get_revenue_chart))
        .route("/charts/user-growth", get(get_user_growth_chart))
        .route("/charts/traffic-sources", get(get_traffic_sources_chart))
        .route("/campaigns", get(get_campaigns).post(search_campaigns));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

fn bad_request(e: QueryError) -> StatusCode {
    warn!("Rejected query: {}", e);
    StatusCode::BAD_REQUEST
}

fn internal_error(what: &str, e: FetchError) -> StatusCode {
    error!("Error fetching {}: {}", what, e);
    StatusCode::INTERNAL_SERVER_ERROR
}
