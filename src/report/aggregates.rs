use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::{serialize_weekday, EventTable, WEEKDAYS};

/// Unique swipes sensed on one day (door agnostic)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_weekday")]
    pub day_of_week: Weekday,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub mean: f64,
}

/// Box-plot statistics of the daily counts falling on one weekday
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdaySummary {
    #[serde(serialize_with = "serialize_weekday")]
    pub day_of_week: Weekday,
    pub days: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// One histogram bar: `count` person-weeks with `days_present` distinct days
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitBin {
    pub days_present: usize,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatVisits {
    /// Distinct days per person per ISO week
    pub days_per_week: Vec<VisitBin>,
    /// Distinct days per person over the whole period
    pub days_per_person: Vec<VisitBin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub person_types: Vec<String>,
    pub events: usize,
    pub people: usize,
}

impl DatasetSummary {
    /// e.g. "Thu, 03 Nov 2022 - Tue, 07 Feb 2023"
    pub fn date_range_label(&self) -> Option<String> {
        match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => Some(format!(
                "{} - {}",
                first.format("%a, %d %b %Y"),
                last.format("%a, %d %b %Y")
            )),
            _ => None,
        }
    }
}

pub fn summarize(events: &EventTable) -> DatasetSummary {
    let person_types: BTreeSet<&str> = events.iter().map(|e| e.person_type.as_str()).collect();
    let people: BTreeSet<u32> = events.iter().map(|e| e.anon_id).collect();
    DatasetSummary {
        first_date: events.min_date(),
        last_date: events.max_date(),
        person_types: person_types.into_iter().map(str::to_string).collect(),
        events: events.len(),
        people: people.len(),
    }
}

/// Events per date. Each event is already one person on one day, so this is
/// the number of distinct people sensed that day.
pub fn daily_counts(events: &EventTable) -> Vec<DailyCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for event in events.iter() {
        *counts.entry(event.access_date).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| DailyCount {
            date,
            day_of_week: date.weekday(),
            count,
        })
        .collect()
}

/// Trailing mean over the current count and up to `window - 1` before it.
/// The first points average whatever history exists.
pub fn rolling_mean(counts: &[DailyCount], window: usize) -> Vec<RollingPoint> {
    let window = window.max(1);
    counts
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let start = (i + 1).saturating_sub(window);
            let frame = &counts[start..=i];
            let total: usize = frame.iter().map(|c| c.count).sum();
            RollingPoint {
                date: point.date,
                mean: total as f64 / frame.len() as f64,
            }
        })
        .collect()
}

/// Linear-interpolated quantile of already sorted values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Per-weekday distribution of daily counts, Monday first. Weekdays with no
/// data are omitted.
pub fn weekday_summary(counts: &[DailyCount]) -> Vec<WeekdaySummary> {
    let mut by_day: HashMap<Weekday, Vec<f64>> = HashMap::new();
    for point in counts {
        by_day.entry(point.day_of_week).or_default().push(point.count as f64);
    }

    WEEKDAYS
        .iter()
        .filter_map(|day| {
            let mut values = by_day.remove(day)?;
            values.sort_by(|a, b| a.total_cmp(b));
            Some(WeekdaySummary {
                day_of_week: *day,
                days: values.len(),
                min: values[0],
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values[values.len() - 1],
            })
        })
        .collect()
}

/// Weekday with the highest median daily count; the earlier day wins a tie
pub fn busiest_weekday(summaries: &[WeekdaySummary]) -> Option<Weekday> {
    let mut best: Option<&WeekdaySummary> = None;
    for summary in summaries {
        match best {
            Some(b) if summary.median <= b.median => {}
            _ => best = Some(summary),
        }
    }
    best.map(|s| s.day_of_week)
}

fn histogram<I: IntoIterator<Item = usize>>(values: I) -> Vec<VisitBin> {
    let mut bins: BTreeMap<usize, usize> = BTreeMap::new();
    for value in values {
        *bins.entry(value).or_default() += 1;
    }
    bins.into_iter()
        .map(|(days_present, count)| VisitBin { days_present, count })
        .collect()
}

/// How often the same card shows up: days per person per ISO week, and days
/// per person over the whole table.
pub fn repeat_visits(events: &EventTable) -> RepeatVisits {
    let mut per_week: HashMap<(u32, i32, u32), usize> = HashMap::new();
    let mut per_person: HashMap<u32, usize> = HashMap::new();
    for event in events.iter() {
        let week = event.access_date.iso_week();
        *per_week.entry((event.anon_id, week.year(), week.week())).or_default() += 1;
        *per_person.entry(event.anon_id).or_default() += 1;
    }
    RepeatVisits {
        days_per_week: histogram(per_week.into_values()),
        days_per_person: histogram(per_person.into_values()),
    }
}
