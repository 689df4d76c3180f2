use serde::Serialize;
use std::fmt;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::domain::EventTable;
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::processing::{BaselineSchema, CleanOutcome, CleaningPipeline, CleaningStats, RawTable, Rejection};

/// Which slot an accepted upload filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadRole {
    Baseline,
    Comparison,
}

impl UploadRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadRole::Baseline => "baseline",
            UploadRole::Comparison => "comparison",
        }
    }
}

impl fmt::Display for UploadRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one upload
#[derive(Debug, Clone)]
pub enum UploadResult {
    Accepted { role: UploadRole, stats: CleaningStats },
    Rejected { rejection: Rejection },
}

impl UploadResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, UploadResult::Accepted { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            UploadResult::Rejected { rejection } => Some(rejection),
            UploadResult::Accepted { .. } => None,
        }
    }
}

/// State for one interactive session.
///
/// The first accepted upload becomes the baseline and fixes the session's
/// schema; every later upload is a comparison checked against it. Sessions
/// share nothing, so two uploaders never see each other's baseline.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    baseline_schema: Option<BaselineSchema>,
    baseline: Option<EventTable>,
    comparison: Option<EventTable>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            baseline_schema: None,
            baseline: None,
            comparison: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn baseline_schema(&self) -> Option<&BaselineSchema> {
        self.baseline_schema.as_ref()
    }

    pub fn baseline(&self) -> Option<&EventTable> {
        self.baseline.as_ref()
    }

    pub fn comparison(&self) -> Option<&EventTable> {
        self.comparison.as_ref()
    }

    /// Run one upload through the cleaning pipeline against this session's
    /// baseline schema.
    ///
    /// State only changes on acceptance. A rejection or an error (such as a
    /// malformed date) leaves schema and tables exactly as they were; the
    /// caller's recourse is a corrected re-upload.
    pub fn upload(&mut self, raw: RawTable, source: &str) -> Result<UploadResult> {
        let span = info_span!("upload", session = %self.id, source = %source);
        let _enter = span.enter();

        let role = if self.baseline_schema.is_none() {
            UploadRole::Baseline
        } else {
            UploadRole::Comparison
        };

        match CleaningPipeline::run(raw, self.baseline_schema.as_ref())? {
            CleanOutcome::Accepted {
                events,
                baseline_schema,
                stats,
            } => {
                info!(role = %role, events = events.len(), "Upload accepted");
                metrics::session::upload_accepted(role.as_str());
                self.baseline_schema = Some(baseline_schema);
                match role {
                    UploadRole::Baseline => self.baseline = Some(events),
                    UploadRole::Comparison => self.comparison = Some(events),
                }
                Ok(UploadResult::Accepted { role, stats })
            }
            CleanOutcome::Rejected { rejection, .. } => {
                warn!(role = %role, "Upload rejected:\n{}", rejection);
                let kind = match &rejection {
                    Rejection::MissingRequiredColumns { .. } => "missing_required_columns",
                    Rejection::SchemaMismatch { .. } => "schema_mismatch",
                };
                metrics::session::upload_rejected(kind);
                Ok(UploadResult::Rejected { rejection })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline_raw() -> RawTable {
        RawTable::from_strings(
            &["Last Name", "First Name", "CDSID", "Person", "Access"],
            &[&["Smith", "Ann", "AB1", "Employee", "03/11/2022"]],
        )
    }

    #[test]
    fn test_first_accepted_upload_is_baseline() {
        let mut session = Session::new();
        let result = session.upload(baseline_raw(), "baseline.csv").unwrap();
        assert!(matches!(result, UploadResult::Accepted { role: UploadRole::Baseline, .. }));
        assert!(session.baseline_schema().is_some());
        assert_eq!(session.baseline().unwrap().len(), 1);
        assert!(session.comparison().is_none());

        let result = session.upload(baseline_raw(), "again.csv").unwrap();
        assert!(matches!(result, UploadResult::Accepted { role: UploadRole::Comparison, .. }));
        assert!(session.comparison().is_some());
    }

    #[test]
    fn test_rejected_upload_leaves_state_untouched() {
        let mut session = Session::new();
        session.upload(baseline_raw(), "baseline.csv").unwrap();
        let before = session.clone();

        let raw = RawTable::from_strings(&["CDSID", "Person", "Access"], &[&["CD2", "Temp", "07/02/2023"]]);
        let result = session.upload(raw, "comparison.csv").unwrap();
        assert!(!result.is_accepted());
        assert_eq!(session.baseline_schema(), before.baseline_schema());
        assert_eq!(session.baseline(), before.baseline());
        assert!(session.comparison().is_none());
    }

    #[test]
    fn test_failed_baseline_does_not_establish_schema() {
        let mut session = Session::new();
        let raw = RawTable::from_strings(&["CDSID", "Person", "Access"], &[&["AB1", "Employee", "3 Nov 2022"]]);
        assert!(session.upload(raw, "bad.csv").is_err());
        assert!(session.baseline_schema().is_none());

        let raw = RawTable::from_strings(&["CDSID", "Access"], &[&["AB1", "03/11/2022"]]);
        let result = session.upload(raw, "short.csv").unwrap();
        assert!(result.rejection().is_some());
        assert!(session.baseline_schema().is_none());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut first = Session::new();
        let mut second = Session::new();
        first.upload(baseline_raw(), "a.csv").unwrap();

        let other = RawTable::from_strings(&["CDSID", "Person", "Access"], &[&["ZZ9", "Temp", "05/11/2022"]]);
        let result = second.upload(other, "b.csv").unwrap();
        assert!(matches!(result, UploadResult::Accepted { role: UploadRole::Baseline, .. }));
        assert_ne!(first.baseline_schema(), second.baseline_schema());
        assert_ne!(first.id(), second.id());
    }
}
