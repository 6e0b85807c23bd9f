use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::date_range::{format_api_date, DateRange};
use crate::error::QueryError;
use crate::models::{Campaign, CampaignStatus};

pub mod transform;

pub use transform::transform;

pub const DEFAULT_PER_PAGE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CampaignStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: CampaignStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn as_query_value(&self) -> String {
        match self {
            StatusFilter::All => "all".to_string(),
            StatusFilter::Only(status) => status.as_str().to_ascii_lowercase(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        CampaignStatus::parse(s)
            .map(StatusFilter::Only)
            .ok_or_else(|| QueryError::UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Flips the comparator result. Equal keys stay equal, which keeps a
    /// stable sort stable in both directions.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(QueryError::UnknownSortDirection(s.to_string())),
        }
    }
}

/// The closed set of campaign columns the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Name,
    Status,
    Budget,
    Spent,
    Impressions,
    Clicks,
    Conversions,
    Cpa,
    Roas,
    StartDate,
    EndDate,
}

/// A borrowed view of one campaign column, typed so the comparison matches
/// the column: text lexicographically, amounts and counts numerically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey<'a> {
    Text(&'a str),
    Amount(f64),
    Count(u64),
}

impl SortKey<'_> {
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Amount(a), SortKey::Amount(b)) => a.total_cmp(b),
            (SortKey::Count(a), SortKey::Count(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl SortField {
    pub const ALL: [SortField; 11] = [
        SortField::Name,
        SortField::Status,
        SortField::Budget,
        SortField::Spent,
        SortField::Impressions,
        SortField::Clicks,
        SortField::Conversions,
        SortField::Cpa,
        SortField::Roas,
        SortField::StartDate,
        SortField::EndDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "campaign_name",
            SortField::Status => "status",
            SortField::Budget => "budget",
            SortField::Spent => "spent",
            SortField::Impressions => "impressions",
            SortField::Clicks => "clicks",
            SortField::Conversions => "conversions",
            SortField::Cpa => "cpa",
            SortField::Roas => "roas",
            SortField::StartDate => "start_date",
            SortField::EndDate => "end_date",
        }
    }

    pub fn key<'a>(&self, campaign: &'a Campaign) -> SortKey<'a> {
        match self {
            SortField::Name => SortKey::Text(&campaign.name),
            SortField::Status => SortKey::Text(campaign.status.as_str()),
            SortField::Budget => SortKey::Amount(campaign.budget),
            SortField::Spent => SortKey::Amount(campaign.spent),
            SortField::Impressions => SortKey::Count(campaign.impressions),
            SortField::Clicks => SortKey::Count(campaign.clicks),
            SortField::Conversions => SortKey::Count(campaign.conversions),
            SortField::Cpa => SortKey::Amount(campaign.cpa),
            SortField::Roas => SortKey::Amount(campaign.roas),
            SortField::StartDate => SortKey::Text(&campaign.start_date),
            SortField::EndDate => SortKey::Text(&campaign.end_date),
        }
    }

    pub fn compare(&self, a: &Campaign, b: &Campaign) -> Ordering {
        self.key(a).compare(&self.key(b))
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("campaign") || wanted.eq_ignore_ascii_case("name") {
            return Ok(SortField::Name);
        }
        if wanted.eq_ignore_ascii_case("startDate") {
            return Ok(SortField::StartDate);
        }
        if wanted.eq_ignore_ascii_case("endDate") {
            return Ok(SortField::EndDate);
        }
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| QueryError::UnknownSortField(s.to_string()))
    }
}

/// Everything the campaign table asks of its data source. Changing the
/// search, status, dates, sort or page size sends the table back to page 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub search: Option<String>,
    pub status_filter: StatusFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_by: Option<SortField>,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub per_page: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search: None,
            status_filter: StatusFilter::All,
            start_date: None,
            end_date: None,
            sort_by: None,
            sort_direction: SortDirection::Asc,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl QueryParams {
    pub fn set_search(&mut self, search: Option<String>) {
        self.search = search.filter(|s| !s.trim().is_empty());
        self.page = 1;
    }

    pub fn set_status_filter(&mut self, status_filter: StatusFilter) {
        self.status_filter = status_filter;
        self.page = 1;
    }

    pub fn set_sort(&mut self, field: Option<SortField>, direction: SortDirection) {
        self.sort_by = field;
        self.sort_direction = direction;
        self.page = 1;
    }

    /// Header-click behaviour: the active column flips direction, any other
    /// column becomes active ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_by == Some(field) {
            let direction = self.sort_direction.flipped();
            self.set_sort(Some(field), direction);
        } else {
            self.set_sort(Some(field), SortDirection::Asc);
        }
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.start_date = range.map(|r| r.from);
        self.end_date = range.and_then(|r| r.to);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    pub fn has_date_bounds(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Query string pairs for `GET /api/campaigns`. Unset and `all` values are
    /// left out so the server applies no bound.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if self.status_filter != StatusFilter::All {
            pairs.push(("status_filter", self.status_filter.as_query_value()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("start_date", format_api_date(start)));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", format_api_date(end)));
        }
        if let Some(field) = self.sort_by {
            pairs.push(("sort_by", field.as_str().to_string()));
            pairs.push(("sort_direction", self.sort_direction.as_str().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_filters_resets_page() {
        let mut params = QueryParams::default();
        params.set_page(3);
        params.set_search(Some("sale".into()));
        assert_eq!(params.page, 1);

        params.set_page(2);
        params.set_status_filter(StatusFilter::Only(CampaignStatus::Paused));
        assert_eq!(params.page, 1);

        params.set_page(2);
        params.toggle_sort(SortField::Roas);
        assert_eq!(params.page, 1);
        assert_eq!(params.sort_direction, SortDirection::Asc);

        params.toggle_sort(SortField::Roas);
        assert_eq!(params.sort_direction, SortDirection::Desc);

        params.toggle_sort(SortField::Budget);
        assert_eq!(params.sort_by, Some(SortField::Budget));
        assert_eq!(params.sort_direction, SortDirection::Asc);

        params.set_page(4);
        assert_eq!(params.page, 4);
    }

    #[test]
    fn blank_search_is_cleared() {
        let mut params = QueryParams::default();
        params.set_search(Some("   ".into()));
        assert_eq!(params.search, None);
    }

    #[test]
    fn query_pairs_skip_unset_values() {
        let params = QueryParams::default();
        assert_eq!(
            params.query_pairs(),
            vec![("page", "1".to_string()), ("per_page", "5".to_string())]
        );

        let mut params = QueryParams::default();
        params.set_status_filter(StatusFilter::Only(CampaignStatus::Active));
        params.set_sort(Some(SortField::Roas), SortDirection::Desc);
        params.set_date_range(Some(DateRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            None,
        )));
        let pairs = params.query_pairs();
        assert!(pairs.contains(&("status_filter", "active".to_string())));
        assert!(pairs.contains(&("sort_by", "roas".to_string())));
        assert!(pairs.contains(&("sort_direction", "desc".to_string())));
        assert!(pairs.contains(&("start_date", "2024-06-01".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "end_date"));
    }

    #[test]
    fn parse_filters_and_fields() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "Completed".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(CampaignStatus::Completed))
        );
        assert!("archived".parse::<StatusFilter>().is_err());

        assert_eq!("campaign".parse::<SortField>(), Ok(SortField::Name));
        assert_eq!("ROAS".parse::<SortField>(), Ok(SortField::Roas));
        assert_eq!("startDate".parse::<SortField>(), Ok(SortField::StartDate));
        assert!("__proto__".parse::<SortField>().is_err());

        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("down".parse::<SortDirection>().is_err());
    }
}
