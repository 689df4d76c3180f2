//! Metrics for the swipe pipeline
//!
//! Thin helpers over the `metrics` facade, named with the standard Prometheus
//! conventions. Without an installed recorder every call is a no-op.

use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// All metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingestion
    IngestionFilesLoaded,
    IngestionFilesRejected,
    IngestionRowsRead,

    // Cleaning
    CleaningRowsDroppedIncomplete,
    CleaningSwipesCollapsed,
    CleaningEventsProduced,
    CleaningDateParseFailures,
    CleaningDuration,

    // Session
    SessionUploadsAccepted,
    SessionUploadsRejected,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::IngestionFilesLoaded => "swipe_ingestion_files_loaded_total",
            MetricName::IngestionFilesRejected => "swipe_ingestion_files_rejected_total",
            MetricName::IngestionRowsRead => "swipe_ingestion_rows_read_total",

            MetricName::CleaningRowsDroppedIncomplete => "swipe_cleaning_rows_dropped_incomplete_total",
            MetricName::CleaningSwipesCollapsed => "swipe_cleaning_swipes_collapsed_total",
            MetricName::CleaningEventsProduced => "swipe_cleaning_events_produced_total",
            MetricName::CleaningDateParseFailures => "swipe_cleaning_date_parse_failures_total",
            MetricName::CleaningDuration => "swipe_cleaning_duration_seconds",

            MetricName::SessionUploadsAccepted => "swipe_session_uploads_accepted_total",
            MetricName::SessionUploadsRejected => "swipe_session_uploads_rejected_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            IngestionFilesLoaded,
            IngestionFilesRejected,
            IngestionRowsRead,
            CleaningRowsDroppedIncomplete,
            CleaningSwipesCollapsed,
            CleaningEventsProduced,
            CleaningDateParseFailures,
            CleaningDuration,
            SessionUploadsAccepted,
            SessionUploadsRejected,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    METRICS_HANDLE.set(handle).ok();
    info!("Metrics system initialized");
    Ok(())
}

/// Render all recorded metrics in the Prometheus text format
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

/// Records elapsed time into a histogram when dropped
pub struct TimingGuard {
    start: Instant,
    histogram: MetricName,
}

impl TimingGuard {
    pub fn new(histogram: MetricName) -> Self {
        Self {
            start: Instant::now(),
            histogram,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        ::metrics::histogram!(self.histogram.as_str()).record(self.elapsed_secs());
    }
}

// ============================================================================
// Ingestion Metrics
// ============================================================================

pub mod ingestion {
    use super::MetricName;

    pub fn file_loaded(kind: &str, rows: usize) {
        ::metrics::counter!(MetricName::IngestionFilesLoaded.as_str(), "kind" => kind.to_string()).increment(1);
        ::metrics::counter!(MetricName::IngestionRowsRead.as_str()).increment(rows as u64);
    }

    pub fn file_rejected(reason: &str) {
        ::metrics::counter!(MetricName::IngestionFilesRejected.as_str(), "reason" => reason.to_string())
            .increment(1);
    }
}

// ============================================================================
// Cleaning Metrics
// ============================================================================

pub mod cleaning {
    use super::{MetricName, TimingGuard};

    pub fn start_timer() -> TimingGuard {
        TimingGuard::new(MetricName::CleaningDuration)
    }

    pub fn rows_dropped_incomplete(count: usize) {
        ::metrics::counter!(MetricName::CleaningRowsDroppedIncomplete.as_str()).increment(count as u64);
    }

    pub fn swipes_collapsed(count: usize) {
        ::metrics::counter!(MetricName::CleaningSwipesCollapsed.as_str()).increment(count as u64);
    }

    pub fn events_produced(count: usize) {
        ::metrics::counter!(MetricName::CleaningEventsProduced.as_str()).increment(count as u64);
    }

    pub fn date_parse_failure() {
        ::metrics::counter!(MetricName::CleaningDateParseFailures.as_str()).increment(1);
    }
}

// ============================================================================
// Session Metrics
// ============================================================================

pub mod session {
    use super::MetricName;

    pub fn upload_accepted(role: &str) {
        ::metrics::counter!(MetricName::SessionUploadsAccepted.as_str(), "role" => role.to_string()).increment(1);
    }

    pub fn upload_rejected(kind: &str) {
        ::metrics::counter!(MetricName::SessionUploadsRejected.as_str(), "kind" => kind.to_string())
            .increment(1);
    }
}
