//! Fetch coordination for the three dashboard panels.
//!
//! The orchestrator owns every piece of mutable dashboard state. Fetches run
//! as tasks in a `JoinSet` that only perform I/O; results are applied on the
//! orchestrator's side in `next_event`, where each resource's request token
//! decides whether the result is still wanted. A fetch that panics resolves
//! its own resource with an error.

use futures_util::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::campaigns::{QueryParams, SortDirection, SortField, StatusFilter};
use crate::date_range::{DateRange, DateSelection};
use crate::error::FetchError;
use crate::export::DashboardSnapshot;
use crate::models::{CampaignPage, ChartData, Metrics};
use crate::source::DataSource;

pub mod debounce;
pub mod resource;

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use resource::{FetchResource, FetchState, RequestToken, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Metrics,
    Charts,
    Campaigns,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Metrics => "metrics",
            ResourceKind::Charts => "charts",
            ResourceKind::Campaigns => "campaigns",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    Loaded(ResourceKind),
    Failed(ResourceKind),
    Discarded(ResourceKind),
    SearchCommitted(String),
}

enum FetchOutcome {
    Metrics(RequestToken, Result<Metrics, FetchError>),
    Charts(RequestToken, Result<ChartData, FetchError>),
    Campaigns(RequestToken, Result<CampaignPage, FetchError>),
}

impl FetchOutcome {
    fn failed(kind: ResourceKind, token: RequestToken, error: FetchError) -> Self {
        match kind {
            ResourceKind::Metrics => FetchOutcome::Metrics(token, Err(error)),
            ResourceKind::Charts => FetchOutcome::Charts(token, Err(error)),
            ResourceKind::Campaigns => FetchOutcome::Campaigns(token, Err(error)),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct DataFetchOrchestrator {
    source: Arc<dyn DataSource>,
    metrics: FetchResource<Metrics>,
    charts: FetchResource<ChartData>,
    campaigns: FetchResource<CampaignPage>,
    query: QueryParams,
    date_selection: Option<DateSelection>,
    search_input: String,
    search: Debouncer<String>,
    fetches: JoinSet<FetchOutcome>,
}

impl DataFetchOrchestrator {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            metrics: FetchResource::new(),
            charts: FetchResource::new(),
            campaigns: FetchResource::new(),
            query: QueryParams::default(),
            date_selection: Some(DateSelection::default()),
            search_input: String::new(),
            search: Debouncer::new(SEARCH_DEBOUNCE),
            fetches: JoinSet::new(),
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_date_selection(mut self, selection: Option<DateSelection>) -> Self {
        self.date_selection = selection;
        self
    }

    pub fn metrics(&self) -> &FetchResource<Metrics> {
        &self.metrics
    }

    pub fn charts(&self) -> &FetchResource<ChartData> {
        &self.charts
    }

    pub fn campaigns(&self) -> &FetchResource<CampaignPage> {
        &self.campaigns
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn date_selection(&self) -> Option<&DateSelection> {
        self.date_selection.as_ref()
    }

    /// The raw, not yet committed search box contents.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Resolved against today's date on every call.
    pub fn date_range(&self) -> Option<DateRange> {
        self.date_selection.and_then(|selection| selection.resolve())
    }

    pub fn is_loading(&self) -> bool {
        self.metrics.is_loading() || self.charts.is_loading() || self.campaigns.is_loading()
    }

    /// Failed only when nothing at all is available and something errored.
    /// Partial data keeps the dashboard usable.
    pub fn is_failed(&self) -> bool {
        let all_empty =
            self.metrics.is_empty() && self.charts.is_empty() && self.campaigns.is_empty();
        all_empty && self.first_error().is_some()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.metrics
            .error()
            .or_else(|| self.charts.error())
            .or_else(|| self.campaigns.error())
    }

    pub fn active_filter_count(&self) -> usize {
        let mut count = 0;
        if self.date_range().is_some() {
            count += 1;
        }
        if self.query.status_filter != StatusFilter::All {
            count += 1;
        }
        count
    }

    pub fn snapshot(&self) -> DashboardSnapshot<'_> {
        DashboardSnapshot {
            metrics: self.metrics.data(),
            charts: self.charts.data(),
            campaigns: self.campaigns.data(),
        }
    }

    /// Manual refresh: every panel reloads with the current filters.
    pub fn refresh_all(&mut self) {
        info!("Refreshing all dashboard resources");
        self.refetch_metrics();
        self.refetch_charts();
        self.refetch_campaigns();
    }

    pub fn refetch_metrics(&mut self) {
        let token = self.metrics.begin();
        let range = self.date_range();
        let source = Arc::clone(&self.source);
        self.spawn_fetch(ResourceKind::Metrics, token, async move {
            FetchOutcome::Metrics(token, source.fetch_metrics(range).await)
        });
    }

    pub fn refetch_charts(&mut self) {
        let token = self.charts.begin();
        let source = Arc::clone(&self.source);
        self.spawn_fetch(ResourceKind::Charts, token, async move {
            FetchOutcome::Charts(token, source.fetch_charts().await)
        });
    }

    pub fn refetch_campaigns(&mut self) {
        let token = self.campaigns.begin();
        let params = self.effective_query();
        let source = Arc::clone(&self.source);
        self.spawn_fetch(ResourceKind::Campaigns, token, async move {
            FetchOutcome::Campaigns(token, source.fetch_campaigns(&params).await)
        });
    }

    /// The table query with the date selection resolved into bounds.
    pub fn effective_query(&self) -> QueryParams {
        let mut params = self.query.clone();
        let range = self.date_range();
        params.start_date = range.map(|r| r.from);
        params.end_date = range.and_then(|r| r.to);
        params
    }

    /// A keystroke in the search box. Nothing is fetched until the input has
    /// been quiet for `SEARCH_DEBOUNCE`.
    pub fn input_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search_input = text.clone();
        self.search.push(text);
    }

    pub fn set_status_filter(&mut self, status_filter: StatusFilter) {
        self.query.set_status_filter(status_filter);
        self.refetch_campaigns();
    }

    pub fn set_sort(&mut self, field: Option<SortField>, direction: SortDirection) {
        self.query.set_sort(field, direction);
        self.refetch_campaigns();
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.query.toggle_sort(field);
        self.refetch_campaigns();
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.set_page(page);
        self.refetch_campaigns();
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        self.query.set_per_page(per_page);
        self.refetch_campaigns();
    }

    /// Metrics and campaigns depend on the date range; charts do not.
    pub fn set_date_selection(&mut self, selection: Option<DateSelection>) {
        self.date_selection = selection;
        self.query.page = 1;
        self.refetch_metrics();
        self.refetch_campaigns();
    }

    pub fn reset_filters(&mut self) {
        self.date_selection = None;
        self.query.set_status_filter(StatusFilter::All);
        self.refetch_metrics();
        self.refetch_campaigns();
    }

    /// Waits for the next fetch result or debounced search commit and applies
    /// it. `None` once nothing is in flight and no search is pending.
    pub async fn next_event(&mut self) -> Option<DashboardEvent> {
        loop {
            if self.fetches.is_empty() && !self.search.is_pending() {
                return None;
            }

            tokio::select! {
                Some(joined) = self.fetches.join_next() => match joined {
                    Ok(outcome) => return Some(self.apply(outcome)),
                    Err(e) => error!("Fetch task did not complete: {}", e),
                },
                search = self.search.ready() => {
                    return Some(self.commit_search(search));
                }
            }
        }
    }

    /// Drives `next_event` until the dashboard is quiet, returning what
    /// happened in order.
    pub async fn settle(&mut self) -> Vec<DashboardEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn commit_search(&mut self, search: String) -> DashboardEvent {
        info!(search = %search, "Committing search");
        self.query.set_search(Some(search.clone()));
        self.refetch_campaigns();
        DashboardEvent::SearchCommitted(search)
    }

    fn apply(&mut self, outcome: FetchOutcome) -> DashboardEvent {
        let (kind, resolution) = match outcome {
            FetchOutcome::Metrics(token, result) => {
                (ResourceKind::Metrics, self.metrics.resolve(token, result))
            }
            FetchOutcome::Charts(token, result) => {
                (ResourceKind::Charts, self.charts.resolve(token, result))
            }
            FetchOutcome::Campaigns(token, result) => {
                (ResourceKind::Campaigns, self.campaigns.resolve(token, result))
            }
        };

        match resolution {
            Resolution::Applied => {
                debug!(resource = %kind, "Resource loaded");
                DashboardEvent::Loaded(kind)
            }
            Resolution::Failed => {
                warn!(
                    resource = %kind,
                    error = self.error_of(kind).unwrap_or_default(),
                    "Resource failed to load"
                );
                DashboardEvent::Failed(kind)
            }
            Resolution::Stale => DashboardEvent::Discarded(kind),
        }
    }

    fn error_of(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Metrics => self.metrics.error(),
            ResourceKind::Charts => self.charts.error(),
            ResourceKind::Campaigns => self.campaigns.error(),
        }
    }

    fn spawn_fetch<F>(&mut self, kind: ResourceKind, token: RequestToken, fetch: F)
    where
        F: std::future::Future<Output = FetchOutcome> + Send + 'static,
    {
        debug!(resource = %kind, source = self.source.id(), "Issuing fetch");
        self.fetches.spawn(async move {
            match AssertUnwindSafe(fetch).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(resource = %kind, "Fetch panicked: {}", message);
                    FetchOutcome::failed(kind, token, FetchError::Panicked(message))
                }
            }
        });
    }
}
