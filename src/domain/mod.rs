use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Serialize, Serializer};

/// One person's presence in the building on one calendar day.
///
/// Door identity and time-of-day are discarded upstream: the source data
/// undercounts through tailgating, so nothing finer than a day is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessEvent {
    #[serde(rename = "Access Date")]
    pub access_date: NaiveDate,
    #[serde(rename = "Day Of Week", serialize_with = "serialize_weekday")]
    pub day_of_week: Weekday,
    #[serde(rename = "Person Type")]
    pub person_type: String,
    /// Session-local anonymous code; never maps back to a name or credential
    #[serde(rename = "anon_id")]
    pub anon_id: u32,
}

impl AccessEvent {
    pub fn new(access_date: NaiveDate, person_type: impl Into<String>, anon_id: u32) -> Self {
        Self {
            access_date,
            day_of_week: access_date.weekday(),
            person_type: person_type.into(),
            anon_id,
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.day_of_week, Weekday::Sat | Weekday::Sun)
    }
}

/// The canonical cleaned table: at most one event per (`anon_id`, `access_date`),
/// ordered by date then id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTable {
    events: Vec<AccessEvent>,
}

impl EventTable {
    pub fn new(mut events: Vec<AccessEvent>) -> Self {
        events.sort_by(|a, b| {
            a.access_date
                .cmp(&b.access_date)
                .then(a.anon_id.cmp(&b.anon_id))
        });
        Self { events }
    }

    pub fn events(&self) -> &[AccessEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessEvent> {
        self.events.iter()
    }

    /// Keep only the events matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&AccessEvent) -> bool,
    {
        Self {
            events: self.events.iter().filter(|e| predicate(e)).cloned().collect(),
        }
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.events.first().map(|e| e.access_date)
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.events.last().map(|e| e.access_date)
    }
}

impl IntoIterator for EventTable {
    type Item = AccessEvent;
    type IntoIter = std::vec::IntoIter<AccessEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

/// Full English weekday name, as shown on charts and in the CSV export
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Monday-first ordering used for weekday groupings
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}
