use anyhow::{bail, Context};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use insights::aggregators::MetricsAggregator;
use insights::config::{Cli, Command, QueryArgs};
use insights::export::{ExportEngine, ExportKind};
use insights::handlers::{self, AppState};
use insights::orchestrator::{DashboardEvent, DataFetchOrchestrator};
use insights::source::MockSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insights=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Serve { listen } => serve(*listen, cli.mock_latency()).await,
        Command::Export { kind, out, query } => export(&cli, *kind, out, query).await,
        Command::Campaigns { query } => list_campaigns(&cli, query).await,
    }
}

async fn serve(addr: SocketAddr, latency: Duration) -> anyhow::Result<()> {
    info!("Starting insights API server...");

    let source = Arc::new(MockSource::new().with_latency(latency));
    let app = handlers::router(AppState::new(source));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

fn orchestrator(cli: &Cli, query: &QueryArgs) -> anyhow::Result<DataFetchOrchestrator> {
    let source = cli.build_source().context("Failed to set up data source")?;
    info!(source = source.id(), "Using data source");
    Ok(DataFetchOrchestrator::new(source)
        .with_query(query.query_params())
        .with_date_selection(query.date_selection()))
}

fn log_events(events: &[DashboardEvent]) {
    for event in events {
        match event {
            DashboardEvent::Failed(kind) => warn!("Failed to load {}", kind),
            DashboardEvent::Discarded(kind) => info!("Discarded stale {} response", kind),
            DashboardEvent::Loaded(kind) => info!("Loaded {}", kind),
            DashboardEvent::SearchCommitted(search) => info!("Search committed: {}", search),
        }
    }
}

async fn export(
    cli: &Cli,
    kind: ExportKind,
    out: &Path,
    query: &QueryArgs,
) -> anyhow::Result<()> {
    let mut dashboard = orchestrator(cli, query)?;
    if let Some(range) = dashboard.date_range() {
        info!("Date range: {}", range.label());
    }

    dashboard.refresh_all();
    let events = dashboard.settle().await;
    log_events(&events);

    if dashboard.is_failed() {
        bail!(
            "Dashboard failed to load: {}",
            dashboard.first_error().unwrap_or("no data")
        );
    }

    if let Some(metrics) = dashboard.metrics().data() {
        for summary in MetricsAggregator::summarize(metrics) {
            info!(
                "{}: {} ({})",
                summary.kpi.label(),
                summary.current,
                summary
                    .progress
                    .status()
                    .map(|status| status.label())
                    .unwrap_or("unavailable")
            );
        }
    }

    let artifact = ExportEngine::today()
        .export(kind, &dashboard.snapshot())
        .with_context(|| match dashboard.first_error() {
            Some(e) => format!("Export failed after a load error: {}", e),
            None => "Export failed".to_string(),
        })?;
    artifact.write_to(out).await?;
    Ok(())
}

async fn list_campaigns(cli: &Cli, query: &QueryArgs) -> anyhow::Result<()> {
    let mut dashboard = orchestrator(cli, query)?;
    dashboard.refetch_campaigns();
    let events = dashboard.settle().await;
    log_events(&events);

    let Some(page) = dashboard.campaigns().data() else {
        bail!(
            "Campaigns failed to load: {}",
            dashboard.campaigns().error().unwrap_or("no data")
        );
    };

    info!(
        "{:<28} {:<10} {:>10} {:>10} {:>6} {:>11} {:>11}",
        "Campaign", "Status", "Budget", "Spent", "ROAS", "Start", "End"
    );
    for campaign in &page.campaigns {
        info!(
            "{:<28} {:<10} {:>10} {:>10} {:>6} {:>11} {:>11}",
            campaign.name,
            campaign.status.as_str(),
            campaign.budget,
            campaign.spent,
            campaign.roas,
            campaign.start_date,
            campaign.end_date
        );
    }

    match page.showing() {
        Some((first, last)) => info!(
            "Showing {} to {} of {} (page {} of {})",
            first,
            last,
            page.total,
            page.page,
            page.total_pages()
        ),
        None => info!("No campaigns match ({} total)", page.total),
    }
    Ok(())
}
