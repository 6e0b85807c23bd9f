use tracing::debug;

use super::{QueryParams, SortDirection, SortField};
use crate::date_range::parse_api_date;
use crate::models::{Campaign, CampaignPage};

/// Search, status filter, date filter, sort, paginate, in that order.
///
/// `total` counts the campaigns that survived the three filters. A page past
/// the end yields an empty `campaigns` list rather than an error.
pub fn transform(campaigns: &[Campaign], params: &QueryParams) -> CampaignPage {
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matching: Vec<&Campaign> = campaigns
        .iter()
        .filter(|c| matches_search(c, search.as_deref()))
        .filter(|c| params.status_filter.matches(c.status))
        .filter(|c| matches_dates(c, params))
        .collect();

    let total = matching.len();

    if let Some(field) = params.sort_by {
        sort_campaigns(&mut matching, field, params.sort_direction);
    }

    let page = params.page.max(1);
    let per_page = params.per_page.max(1);
    let start = (page as usize - 1).saturating_mul(per_page as usize);

    debug!(
        total,
        page,
        per_page,
        "Filtered {} of {} campaigns",
        total,
        campaigns.len()
    );

    CampaignPage {
        campaigns: matching
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect(),
        total,
        page,
        per_page,
    }
}

fn matches_search(campaign: &Campaign, lowered_search: Option<&str>) -> bool {
    match lowered_search {
        Some(needle) => campaign.name.to_lowercase().contains(needle),
        None => true,
    }
}

/// Campaigns whose start date cannot be parsed never match an active bound.
fn matches_dates(campaign: &Campaign, params: &QueryParams) -> bool {
    if !params.has_date_bounds() {
        return true;
    }
    let Ok(start) = parse_api_date(&campaign.start_date) else {
        return false;
    };
    params.start_date.map_or(true, |from| start >= from)
        && params.end_date.map_or(true, |to| start <= to)
}

/// `sort_by` is a stable sort; descending flips the comparator, so ties keep
/// their incoming order in both directions.
fn sort_campaigns(items: &mut [&Campaign], field: SortField, direction: SortDirection) {
    items.sort_by(|a, b| direction.apply(field.compare(a, b)));
}
