use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, instrument, warn};

use super::anonymize::anonymize;
use super::compatibility::{check_compatibility, check_required_columns, BaselineSchema, Rejection};
use super::dates::parse_dates;
use super::dedupe::dedupe_to_daily;
use super::headers::normalize_headers;
use super::junk::strip_junk;
use super::table::RawTable;
use crate::domain::EventTable;
use crate::error::{PipelineError, Result};
use crate::observability::metrics;

/// Row counts from one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningStats {
    pub rows_read: usize,
    pub rows_dropped_incomplete: usize,
    pub swipes_collapsed: usize,
    pub events: usize,
    pub people: usize,
}

/// Result of a pipeline run that did not hit a fatal error
#[derive(Debug, Clone)]
pub enum CleanOutcome {
    Accepted {
        events: EventTable,
        baseline_schema: BaselineSchema,
        stats: CleaningStats,
    },
    /// No table was produced; `baseline_schema` is whatever the caller passed in
    Rejected {
        baseline_schema: Option<BaselineSchema>,
        rejection: Rejection,
    },
}

impl CleanOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CleanOutcome::Accepted { .. })
    }

    pub fn events(&self) -> Option<&EventTable> {
        match self {
            CleanOutcome::Accepted { events, .. } => Some(events),
            CleanOutcome::Rejected { .. } => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            CleanOutcome::Accepted { .. } => None,
            CleanOutcome::Rejected { rejection, .. } => Some(rejection),
        }
    }

    pub fn baseline_schema(&self) -> Option<&BaselineSchema> {
        match self {
            CleanOutcome::Accepted { baseline_schema, .. } => Some(baseline_schema),
            CleanOutcome::Rejected { baseline_schema, .. } => baseline_schema.as_ref(),
        }
    }
}

/// The fixed cleaning sequence:
/// normalize → required-columns gate → strip junk → compatibility check →
/// parse dates → anonymize → dedupe.
///
/// Holds no state between runs; the baseline schema is threaded through by
/// the caller. There is no retry: a rejection or a date parse failure ends
/// the run for that upload.
pub struct CleaningPipeline;

impl CleaningPipeline {
    #[instrument(skip_all, fields(rows = raw.len(), has_baseline = baseline.is_some()))]
    pub fn run(raw: RawTable, baseline: Option<&BaselineSchema>) -> Result<CleanOutcome> {
        let _timing = metrics::cleaning::start_timer();
        let rows_read = raw.len();

        let table = normalize_headers(raw);

        if let Some(rejection) = check_required_columns(&table) {
            return Ok(CleanOutcome::Rejected {
                baseline_schema: baseline.cloned(),
                rejection,
            });
        }

        let table = strip_junk(table);
        let rows_kept = table.len();
        metrics::cleaning::rows_dropped_incomplete(rows_read - rows_kept);

        let check = check_compatibility(table, baseline);
        if let Some(rejection) = check.rejection {
            return Ok(CleanOutcome::Rejected {
                baseline_schema: baseline.cloned(),
                rejection,
            });
        }
        let baseline_schema = check.schema;

        let dated = parse_dates(check.table).map_err(|e| {
            if let PipelineError::DateParse { row, value, .. } = &e {
                warn!(row, value = %value, "Access date does not match DD/MM/YYYY");
                metrics::cleaning::date_parse_failure();
            }
            e
        })?;
        let anonymized = anonymize(dated)?;
        let people: HashSet<u32> = anonymized.rows.iter().map(|r| r.anon_id).collect();
        let events = dedupe_to_daily(anonymized)?;

        let stats = CleaningStats {
            rows_read,
            rows_dropped_incomplete: rows_read - rows_kept,
            swipes_collapsed: rows_kept - events.len(),
            events: events.len(),
            people: people.len(),
        };
        metrics::cleaning::swipes_collapsed(stats.swipes_collapsed);
        metrics::cleaning::events_produced(stats.events);

        if events.is_empty() {
            warn!("Every row was dropped during cleaning; the table is empty");
        }
        info!(
            rows_read = stats.rows_read,
            dropped = stats.rows_dropped_incomplete,
            collapsed = stats.swipes_collapsed,
            events = stats.events,
            people = stats.people,
            "Cleaned upload"
        );

        Ok(CleanOutcome::Accepted {
            events,
            baseline_schema,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: [&str; 8] = [
        "Last Name",
        "First Name",
        "CDSID",
        "Person",
        "Access",
        "Reader Description",
        "Transaction Type",
        "Category Used",
    ];

    #[test]
    fn test_bootstrap_run_produces_schema_and_stats() {
        let raw = RawTable::from_strings(
            &HEADERS,
            &[
                &["Smith", "Ann", "AB1", "Employee", "03/11/2022", "Front", "Granted", ""],
                &["Smith", "Ann", "AB1", "Employee", "03/11/2022", "Lab", "Granted", ""],
                &["Jones", "Bob", "CD2", "Contractor", "", "Front", "Granted", ""],
            ],
        );
        let outcome = CleaningPipeline::run(raw, None).unwrap();
        match outcome {
            CleanOutcome::Accepted {
                events,
                baseline_schema,
                stats,
            } => {
                assert_eq!(events.len(), 1);
                assert!(!baseline_schema.columns().contains(&"Category Used".to_string()));
                assert!(baseline_schema.columns().contains(&"Person Type".to_string()));
                assert_eq!(
                    stats,
                    CleaningStats {
                        rows_read: 3,
                        rows_dropped_incomplete: 1,
                        swipes_collapsed: 1,
                        events: 1,
                        people: 1,
                    }
                );
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_column_rejects_before_cleaning() {
        let raw = RawTable::from_strings(&["CDSID", "Access"], &[&["AB1", "not a date"]]);
        let outcome = CleaningPipeline::run(raw, None).unwrap();
        assert!(!outcome.is_accepted());
        assert!(outcome.baseline_schema().is_none());
        assert_eq!(outcome.rejection().unwrap().missing(), &["Person Type".to_string()]);
    }

    #[test]
    fn test_mismatch_halts_before_date_parsing() {
        let baseline = BaselineSchema::new(["Access Date", "CDSID", "Person Type"]);
        let raw = RawTable::from_strings(
            &["CDSID", "Person", "Access", "Extra"],
            &[&["AB1", "Employee", "garbage", "x"]],
        );
        let outcome = CleaningPipeline::run(raw, Some(&baseline)).unwrap();
        assert!(outcome.events().is_none());
        assert_eq!(outcome.baseline_schema(), Some(&baseline));
    }

    #[test]
    fn test_bad_date_is_fatal() {
        let raw = RawTable::from_strings(&["CDSID", "Person", "Access"], &[&["AB1", "Employee", "2022-11-03"]]);
        assert!(matches!(
            CleaningPipeline::run(raw, None),
            Err(PipelineError::DateParse { .. })
        ));
    }

    #[test]
    fn test_all_junk_rows_is_an_empty_acceptance() {
        let raw = RawTable::from_strings(&["CDSID", "Person", "Access"], &[&["AB1", "", ""], &["", "Employee", ""]]);
        let outcome = CleaningPipeline::run(raw, None).unwrap();
        assert!(outcome.is_accepted());
        assert!(outcome.events().unwrap().is_empty());
    }
}
