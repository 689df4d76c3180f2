use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

use crate::config::FilterConfig;
use crate::domain::EventTable;

/// Row filters applied to a cleaned table before aggregation. They are plain
/// predicate removals and carry none of the pipeline's invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub remove_weekends: bool,
    /// Inclusive date range to exclude, when set
    pub holidays: Option<(NaiveDate, NaiveDate)>,
    /// Person types to keep; `None` keeps every type
    pub person_types: Option<BTreeSet<String>>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

impl EventFilter {
    /// Nothing is removed
    pub fn none() -> Self {
        Self {
            remove_weekends: false,
            holidays: None,
            person_types: None,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            remove_weekends: config.remove_weekends,
            holidays: config
                .remove_holidays
                .then_some((config.holiday_start, config.holiday_end)),
            person_types: None,
        }
    }

    pub fn with_person_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.person_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn apply(&self, events: &EventTable) -> EventTable {
        let filtered = events.filter(|event| {
            if self.remove_weekends && event.is_weekend() {
                return false;
            }
            if let Some((start, end)) = self.holidays {
                if event.access_date >= start && event.access_date <= end {
                    return false;
                }
            }
            if let Some(types) = &self.person_types {
                if !types.contains(&event.person_type) {
                    return false;
                }
            }
            true
        });
        debug!(before = events.len(), after = filtered.len(), "Applied event filter");
        filtered
    }
}

/// Drop comparison events dated on or before the last baseline day, so the
/// two periods never overlap.
pub fn remove_overlap(comparison: &EventTable, last_baseline_date: NaiveDate) -> EventTable {
    comparison.filter(|event| event.access_date > last_baseline_date)
}
