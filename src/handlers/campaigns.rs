use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{bad_request, internal_error, AppState};
use crate::campaigns::{QueryParams, SortDirection, SortField, StatusFilter};
use crate::date_range::parse_api_date;
use crate::error::QueryError;
use crate::models::CampaignPage;

/// Raw campaign query, as sent in the query string of `GET /api/campaigns`
/// or the JSON body of `POST /api/campaigns`.
#[derive(Debug, Default, Deserialize)]
pub struct CampaignQuery {
    pub search: Option<String>,
    pub status_filter: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl CampaignQuery {
    pub fn into_params(self) -> Result<QueryParams, QueryError> {
        let mut params = QueryParams::default();

        params.search = non_blank(self.search.as_deref()).map(str::to_string);
        if let Some(status) = non_blank(self.status_filter.as_deref()) {
            params.status_filter = status.parse::<StatusFilter>()?;
        }
        params.start_date = non_blank(self.start_date.as_deref())
            .map(parse_api_date)
            .transpose()?;
        params.end_date = non_blank(self.end_date.as_deref())
            .map(parse_api_date)
            .transpose()?;
        if let (Some(start), Some(end)) = (params.start_date, params.end_date) {
            if end < start {
                params.start_date = Some(end);
                params.end_date = Some(start);
            }
        }
        params.sort_by = non_blank(self.sort_by.as_deref())
            .map(str::parse::<SortField>)
            .transpose()?;
        if let Some(direction) = non_blank(self.sort_direction.as_deref()) {
            params.sort_direction = direction.parse::<SortDirection>()?;
        }

        match self.page {
            Some(0) => return Err(QueryError::NotPositive("page")),
            Some(page) => params.page = page,
            None => {}
        }
        match self.per_page {
            Some(0) => return Err(QueryError::NotPositive("per_page")),
            Some(per_page) => params.per_page = per_page,
            None => {}
        }

        Ok(params)
    }
}

async fn campaign_page(state: &AppState, query: CampaignQuery) -> Result<CampaignPage, StatusCode> {
    let params = query.into_params().map_err(bad_request)?;
    state
        .source
        .fetch_campaigns(&params)
        .await
        .map_err(|e| internal_error("campaigns", e))
}

pub async fn get_campaigns(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> Result<Json<CampaignPage>, StatusCode> {
    Ok(Json(campaign_page(&state, query).await?))
}

pub async fn search_campaigns(
    State(state): State<AppState>,
    Json(query): Json<CampaignQuery>,
) -> Result<Json<CampaignPage>, StatusCode> {
    Ok(Json(campaign_page(&state, query).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CampaignStatus;
    use chrono::NaiveDate;

    #[test]
    fn empty_query_uses_defaults() {
        let params = CampaignQuery::default().into_params().unwrap();
        assert_eq!(params, QueryParams::default());
    }

    #[test]
    fn full_query_parses() {
        let query = CampaignQuery {
            search: Some("  sale ".into()),
            status_filter: Some("active".into()),
            start_date: Some("2024-07-01".into()),
            end_date: Some("2024-06-01".into()),
            sort_by: Some("roas".into()),
            sort_direction: Some("desc".into()),
            page: Some(2),
            per_page: Some(3),
        };
        let params = query.into_params().unwrap();

        assert_eq!(params.search.as_deref(), Some("sale"));
        assert_eq!(params.status_filter, StatusFilter::Only(CampaignStatus::Active));
        assert_eq!(params.start_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(params.end_date, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(params.sort_by, Some(SortField::Roas));
        assert_eq!(params.sort_direction, SortDirection::Desc);
        assert_eq!((params.page, params.per_page), (2, 3));
    }

    #[test]
    fn unknown_values_are_query_errors() {
        let bad_status = CampaignQuery {
            status_filter: Some("archived".into()),
            ..CampaignQuery::default()
        };
        assert!(matches!(
            bad_status.into_params(),
            Err(QueryError::UnknownStatus(_))
        ));

        let bad_sort = CampaignQuery {
            sort_by: Some("colour".into()),
            ..CampaignQuery::default()
        };
        assert!(matches!(
            bad_sort.into_params(),
            Err(QueryError::UnknownSortField(_))
        ));

        let zero_page = CampaignQuery {
            page: Some(0),
            ..CampaignQuery::default()
        };
        assert_eq!(zero_page.into_params(), Err(QueryError::NotPositive("page")));
    }
}
