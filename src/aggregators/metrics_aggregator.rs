use super::{Kpi, KpiSummary, Progress, ProgressStatus};
use crate::models::{MetricSnapshot, Metrics};

const ON_TRACK_THRESHOLD: f64 = 80.0;
const TARGET_REACHED_THRESHOLD: f64 = 100.0;

/// Derives change and progress figures for the KPI cards. Stateless.
pub struct MetricsAggregator;

impl MetricsAggregator {
    pub fn summarize(metrics: &Metrics) -> Vec<KpiSummary> {
        Kpi::ALL
            .into_iter()
            .map(|kpi| Self::summarize_kpi(kpi, kpi.snapshot(metrics)))
            .collect()
    }

    pub fn summarize_kpi(kpi: Kpi, snapshot: &MetricSnapshot) -> KpiSummary {
        KpiSummary {
            kpi,
            current: snapshot.current,
            previous: snapshot.previous,
            change: Self::change_percent(snapshot),
            target: snapshot.target,
            progress: Self::progress(snapshot.current, snapshot.target),
        }
    }

    /// The precomputed change when the source sent one, otherwise
    /// `(current - previous) / previous * 100`. `None` when `previous` is zero.
    pub fn change_percent(snapshot: &MetricSnapshot) -> Option<f64> {
        if let Some(change) = snapshot.change.filter(|c| c.is_finite()) {
            return Some(change);
        }
        if snapshot.previous == 0.0 {
            return None;
        }
        let change = (snapshot.current - snapshot.previous) / snapshot.previous * 100.0;
        change.is_finite().then_some(change)
    }

    pub fn progress(current: f64, target: f64) -> Progress {
        if target.is_nan() || target <= 0.0 {
            return Progress::Unavailable;
        }
        let percent = current / target * 100.0;
        if !percent.is_finite() {
            return Progress::Unavailable;
        }
        let status = if percent >= TARGET_REACHED_THRESHOLD {
            ProgressStatus::TargetReached
        } else if percent >= ON_TRACK_THRESHOLD {
            ProgressStatus::OnTrack
        } else {
            ProgressStatus::NeedsAttention
        };
        Progress::Available { percent, status }
    }
}
