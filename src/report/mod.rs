//! Chart-ready aggregates over cleaned tables.
//!
//! Everything here is caller-side post-processing: row filters and
//! group/count summaries that a dashboard binds to its charts. Nothing in
//! this module renders anything.

pub mod aggregates;
pub mod filters;

use chrono::Weekday;
use serde::{Serialize, Serializer};
use std::fmt::Write as _;

use crate::domain::{weekday_name, EventTable};
pub use aggregates::{
    busiest_weekday, daily_counts, repeat_visits, rolling_mean, summarize, weekday_summary, DailyCount,
    DatasetSummary, RepeatVisits, RollingPoint, VisitBin, WeekdaySummary,
};
pub use filters::{remove_overlap, EventFilter};

fn serialize_optional_weekday<S: Serializer>(day: &Option<Weekday>, serializer: S) -> Result<S::Ok, S::Error> {
    match day {
        Some(day) => serializer.serialize_some(weekday_name(*day)),
        None => serializer.serialize_none(),
    }
}

/// Aggregates for one period (baseline or comparison)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub label: String,
    pub summary: DatasetSummary,
    pub daily_counts: Vec<DailyCount>,
    pub rolling_mean: Vec<RollingPoint>,
    pub weekday_summary: Vec<WeekdaySummary>,
    #[serde(serialize_with = "serialize_optional_weekday")]
    pub busiest_weekday: Option<Weekday>,
    pub repeat_visits: RepeatVisits,
}

impl PeriodReport {
    pub fn build(label: &str, events: &EventTable, rolling_window: usize) -> Self {
        let counts = daily_counts(events);
        let weekdays = weekday_summary(&counts);
        Self {
            label: label.to_string(),
            summary: summarize(events),
            rolling_mean: rolling_mean(&counts, rolling_window),
            busiest_weekday: busiest_weekday(&weekdays),
            weekday_summary: weekdays,
            daily_counts: counts,
            repeat_visits: repeat_visits(events),
        }
    }
}

/// Baseline versus comparison, after filters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub baseline: PeriodReport,
    pub comparison: Option<PeriodReport>,
}

impl ComparisonReport {
    /// Build the report. Comparison days on or before the last (unfiltered)
    /// baseline day are removed before filtering.
    pub fn build(
        baseline: &EventTable,
        comparison: Option<&EventTable>,
        filter: &EventFilter,
        rolling_window: usize,
    ) -> Self {
        let comparison = comparison.map(|table| {
            let table = match baseline.max_date() {
                Some(last) => remove_overlap(table, last),
                None => table.clone(),
            };
            PeriodReport::build("Comparison", &filter.apply(&table), rolling_window)
        });
        Self {
            baseline: PeriodReport::build("Baseline", &filter.apply(baseline), rolling_window),
            comparison,
        }
    }

    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for period in std::iter::once(&self.baseline).chain(self.comparison.iter()) {
            render_period(&mut out, period);
        }
        out
    }
}

fn render_period(out: &mut String, period: &PeriodReport) {
    let _ = writeln!(out, "{} Door Data", period.label);
    match period.summary.date_range_label() {
        Some(range) => {
            let _ = writeln!(out, "  {}", range);
        }
        None => {
            let _ = writeln!(out, "  (no events after filtering)");
        }
    }
    let _ = writeln!(
        out,
        "  events: {}  people: {}  person types: {}",
        period.summary.events,
        period.summary.people,
        period.summary.person_types.join(", ")
    );
    if let Some(day) = period.busiest_weekday {
        let _ = writeln!(out, "  busiest weekday (median): {}", weekday_name(day));
    }

    let _ = writeln!(out, "  Unique swipes per day:");
    for (point, rolling) in period.daily_counts.iter().zip(&period.rolling_mean) {
        let _ = writeln!(
            out,
            "    {} {:<9} {:>4}  rolling {:>6.1}",
            point.date,
            weekday_name(point.day_of_week),
            point.count,
            rolling.mean
        );
    }

    let _ = writeln!(out, "  By weekday (min / q1 / median / q3 / max):");
    for s in &period.weekday_summary {
        let _ = writeln!(
            out,
            "    {:<9} n={:<3} {:.1} / {:.1} / {:.1} / {:.1} / {:.1}",
            weekday_name(s.day_of_week),
            s.days,
            s.min,
            s.q1,
            s.median,
            s.q3,
            s.max
        );
    }

    let _ = writeln!(out, "  Days present per person per week:");
    for bin in &period.repeat_visits.days_per_week {
        let _ = writeln!(out, "    {} day(s): {}", bin.days_present, bin.count);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccessEvent;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_comparison_drops_overlap_then_filters() {
        let baseline = EventTable::new(vec![
            AccessEvent::new(date(2023, 2, 6), "Employee", 0),
            AccessEvent::new(date(2023, 2, 7), "Employee", 1),
        ]);
        let comparison = EventTable::new(vec![
            AccessEvent::new(date(2023, 2, 7), "Employee", 0),
            AccessEvent::new(date(2023, 2, 8), "Employee", 0),
            // Saturday
            AccessEvent::new(date(2023, 2, 11), "Employee", 1),
        ]);
        let report = ComparisonReport::build(&baseline, Some(&comparison), &EventFilter::default(), 6);
        let comparison = report.comparison.unwrap();
        assert_eq!(comparison.summary.first_date, Some(date(2023, 2, 8)));
        assert_eq!(comparison.summary.events, 1);
        assert_eq!(report.baseline.summary.events, 2);
    }

    #[test]
    fn test_report_serializes_weekday_names() {
        let baseline = EventTable::new(vec![AccessEvent::new(date(2022, 11, 3), "Employee", 0)]);
        let report = ComparisonReport::build(&baseline, None, &EventFilter::none(), 6);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["baseline"]["busiest_weekday"], "Thursday");
        assert_eq!(json["baseline"]["daily_counts"][0]["day_of_week"], "Thursday");
        assert_eq!(json["baseline"]["daily_counts"][0]["date"], "2022-11-03");
        assert!(json["comparison"].is_null());
    }

    #[test]
    fn test_text_rendering_mentions_each_period() {
        let baseline = EventTable::new(vec![AccessEvent::new(date(2022, 11, 3), "Employee", 0)]);
        let comparison = EventTable::new(vec![AccessEvent::new(date(2023, 2, 9), "Employee", 0)]);
        let text = ComparisonReport::build(&baseline, Some(&comparison), &EventFilter::none(), 6).render_text();
        assert!(text.contains("Baseline Door Data"));
        assert!(text.contains("Comparison Door Data"));
        assert!(text.contains("Thu, 03 Nov 2022 - Thu, 03 Nov 2022"));
        assert!(text.contains("busiest weekday (median): Thursday"));
    }
}
