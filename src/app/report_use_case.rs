use anyhow::{bail, Result};
use tracing::info;

use crate::config::Config;
use crate::report::{ComparisonReport, EventFilter};
use crate::session::Session;

/// Use case for turning a session's cleaned tables into chart-ready aggregates
pub struct ReportUseCase {
    rolling_window: usize,
}

impl ReportUseCase {
    pub fn new(rolling_window: usize) -> Self {
        Self { rolling_window }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.report.rolling_window)
    }

    pub fn build(&self, session: &Session, filter: &EventFilter) -> Result<ComparisonReport> {
        let Some(baseline) = session.baseline() else {
            bail!("No baseline has been loaded in this session");
        };
        let report = ComparisonReport::build(baseline, session.comparison(), filter, self.rolling_window);
        info!(
            session = %session.id(),
            baseline_events = report.baseline.summary.events,
            comparison_events = ?report.comparison.as_ref().map(|c| c.summary.events),
            "Built report"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::RawTable;

    #[test]
    fn test_requires_a_baseline() {
        let session = Session::new();
        assert!(ReportUseCase::new(6).build(&session, &EventFilter::none()).is_err());
    }

    #[test]
    fn test_builds_from_session_tables() {
        let mut session = Session::new();
        let raw = RawTable::from_strings(
            &["CDSID", "Person", "Access"],
            &[&["AB1", "Employee", "03/11/2022"], &["CD2", "Temp", "03/11/2022"]],
        );
        session.upload(raw, "baseline.csv").unwrap();

        let report = ReportUseCase::from_config(&Config::default())
            .build(&session, &EventFilter::none())
            .unwrap();
        assert_eq!(report.baseline.daily_counts[0].count, 2);
        assert!(report.comparison.is_none());
    }
}
