use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{bad_request, internal_error, AppState};
use crate::date_range::{parse_api_date, DateRange};
use crate::error::QueryError;
use crate::models::Metrics;

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateQuery {
    /// An `end_date` without a `start_date` bounds nothing and is ignored.
    pub fn into_range(self) -> Result<Option<DateRange>, QueryError> {
        let from = self.start_date.as_deref().map(parse_api_date).transpose()?;
        let to = self.end_date.as_deref().map(parse_api_date).transpose()?;
        Ok(from.map(|from| DateRange::new(from, to)))
    }
}

pub async fn get_metrics(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Metrics>, StatusCode> {
    let range = query.into_range().map_err(bad_request)?;
    let metrics = state
        .source
        .fetch_metrics(range)
        .await
        .map_err(|e| internal_error("metrics", e))?;
    Ok(Json(metrics))
}
