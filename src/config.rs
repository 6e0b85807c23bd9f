use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::campaigns::{QueryParams, SortDirection, SortField, StatusFilter, DEFAULT_PER_PAGE};
use crate::date_range::{DatePreset, DateSelection};
use crate::error::FetchError;
use crate::export::ExportKind;
use crate::source::{DataSource, MockSource, RemoteSource};

#[derive(Parser, Debug)]
#[command(name = "insights")]
#[command(about = "Marketing analytics dashboard data pipeline")]
#[command(version)]
pub struct Cli {
    /// Where dashboard data comes from
    #[arg(
        long,
        value_enum,
        env = "INSIGHTS_SOURCE",
        default_value_t = SourceKind::Mock,
        global = true
    )]
    pub source: SourceKind,

    /// Base url of the analytics API (remote source only)
    #[arg(
        long,
        env = "INSIGHTS_API_URL",
        default_value = "http://localhost:8001/api",
        global = true
    )]
    pub api_url: String,

    /// Per-request timeout for the remote source
    #[arg(
        long,
        env = "INSIGHTS_REQUEST_TIMEOUT_SECS",
        default_value_t = 10,
        global = true
    )]
    pub request_timeout_secs: u64,

    /// Artificial delay added to every mock answer
    #[arg(long, env = "INSIGHTS_MOCK_LATENCY_MS", default_value_t = 0, global = true)]
    pub mock_latency_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Mock,
    Remote,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the analytics API from the bundled mock data
    Serve {
        #[arg(long, env = "INSIGHTS_LISTEN", default_value = "0.0.0.0:8001")]
        listen: SocketAddr,
    },

    /// Load the dashboard and write one export file
    Export {
        /// metrics, charts, campaigns or report
        #[arg(long)]
        kind: ExportKind,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Load one page of the campaign table and log it
    Campaigns {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Date preset: last7days, last30days, last3months, thismonth, lastmonth, thisyear, alltime
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub range: Option<DatePreset>,

    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day, YYYY-MM-DD
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(long)]
    pub search: Option<String>,

    /// all, active, paused or completed
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    #[arg(long)]
    pub sort_by: Option<SortField>,

    #[arg(long, default_value = "asc")]
    pub sort_direction: SortDirection,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,
}

impl QueryArgs {
    /// Table state without dates; the date selection is resolved separately.
    pub fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::default();
        params.set_search(self.search.clone());
        params.set_status_filter(self.status);
        params.set_sort(self.sort_by, self.sort_direction);
        params.set_per_page(self.per_page);
        params.set_page(self.page);
        params
    }

    /// `--range` wins, then `--from`/`--to`, then the last 30 days.
    pub fn date_selection(&self) -> Option<DateSelection> {
        if let Some(preset) = self.range {
            return Some(DateSelection::Preset(preset));
        }
        if self.from.is_some() || self.to.is_some() {
            return Some(DateSelection::Explicit {
                from: self.from,
                to: self.to,
            });
        }
        Some(DateSelection::default())
    }
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }

    pub fn build_source(&self) -> Result<Arc<dyn DataSource>, FetchError> {
        let source: Arc<dyn DataSource> = match self.source {
            SourceKind::Mock => Arc::new(MockSource::new().with_latency(self.mock_latency())),
            SourceKind::Remote => {
                Arc::new(RemoteSource::new(&self.api_url, self.request_timeout())?)
            }
        };
        Ok(source)
    }
}
