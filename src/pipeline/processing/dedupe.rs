use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

use super::table::AnonymizedTable;
use crate::constants::PERSON_TYPE;
use crate::domain::{AccessEvent, EventTable};
use crate::error::{PipelineError, Result};

/// Collapse swipes to one event per person per day.
///
/// Door and transaction columns are dropped along with any other unused
/// pass-through column. The key is (`anon_id`, `access_date`); the first row
/// seen for a key wins, including its person type.
pub fn dedupe_to_daily(table: AnonymizedTable) -> Result<EventTable> {
    let person_index = table
        .column_index(PERSON_TYPE)
        .ok_or_else(|| PipelineError::MissingColumn(PERSON_TYPE.to_string()))?;

    let dropped: Vec<&str> = table
        .headers
        .iter()
        .map(String::as_str)
        .filter(|h| *h != PERSON_TYPE)
        .collect();
    debug!(?dropped, "Dropping sub-day and unused columns");

    let total = table.len();
    let mut seen: HashSet<(u32, NaiveDate)> = HashSet::with_capacity(total);
    let mut events = Vec::new();

    for mut row in table.rows {
        if !seen.insert((row.anon_id, row.access_date)) {
            continue;
        }
        events.push(AccessEvent {
            access_date: row.access_date,
            day_of_week: row.day_of_week,
            person_type: row.values.swap_remove(person_index),
            anon_id: row.anon_id,
        });
    }

    debug!(events = events.len(), collapsed = total - events.len(), "Collapsed swipes to daily events");
    Ok(EventTable::new(events))
}
