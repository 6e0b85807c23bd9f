use axum::{extract::State, http::StatusCode, Json};

use super::{internal_error, AppState};
use crate::models::{ChartData, ChartResponse, RevenuePoint, TrafficSourcePoint, UserGrowthPoint};

async fn load_charts(state: &AppState) -> Result<ChartData, StatusCode> {
    state
        .source
        .fetch_charts()
        .await
        .map_err(|e| internal_error("chart data", e))
}

pub async fn get_revenue_chart(
    State(state): State<AppState>,
) -> Result<Json<ChartResponse<RevenuePoint>>, StatusCode> {
    let charts = load_charts(&state).await?;
    Ok(Json(ChartResponse {
        data: charts.revenue,
    }))
}

pub async fn get_user_growth_chart(
    State(state): State<AppState>,
) -> Result<Json<ChartResponse<UserGrowthPoint>>, StatusCode> {
    let charts = load_charts(&state).await?;
    Ok(Json(ChartResponse {
        data: charts.user_growth,
    }))
}

pub async fn get_traffic_sources_chart(
    State(state): State<AppState>,
) -> Result<Json<ChartResponse<TrafficSourcePoint>>, StatusCode> {
    let charts = load_charts(&state).await?;
    Ok(Json(ChartResponse {
        data: charts.traffic_sources,
    }))
}
