use crate::record::{CalendarRecord, format_calendar_date};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// The full trading calendar, keyed by date.
///
/// Keying by date makes "one record per date" structural: inserting a record
/// for a date that is already present replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarStore {
    records: BTreeMap<NaiveDate, CalendarRecord>,
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store, rejecting input that repeats a date.
    pub fn from_records<I>(records: I) -> Result<Self, NaiveDate>
    where
        I: IntoIterator<Item = CalendarRecord>,
    {
        let mut store = Self::new();
        for record in records {
            let date = record.date;
            if store.records.insert(date, record).is_some() {
                return Err(date);
            }
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, date: NaiveDate) -> Option<&CalendarRecord> {
        self.records.get(&date)
    }

    pub fn find_mut(&mut self, date: NaiveDate) -> Option<&mut CalendarRecord> {
        self.records.get_mut(&date)
    }

    /// Insert or replace the record for `record.date`, returning the previous one.
    pub fn upsert(&mut self, record: CalendarRecord) -> Option<CalendarRecord> {
        self.records.insert(record.date, record)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.keys().next_back().copied()
    }

    /// Records in ascending date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &CalendarRecord> {
        self.records.values()
    }

    /// Records in descending date order, the persisted order.
    pub fn iter_desc(&self) -> impl Iterator<Item = &CalendarRecord> {
        self.records.values().rev()
    }

    pub fn records_desc(&self) -> Vec<CalendarRecord> {
        self.iter_desc().cloned().collect()
    }

    /// Snapshot of every `(date, holiday name)` pair currently recorded.
    ///
    /// Trading days contribute an empty name so the snapshot covers the
    /// whole table, not only non-trading days.
    pub fn existing_holidays(&self) -> HashSet<(String, String)> {
        self.records
            .values()
            .map(|record| {
                (
                    format_calendar_date(record.date),
                    record.name().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }
}

impl FromIterator<CalendarRecord> for CalendarStore {
    /// Collects records with last-one-wins semantics for repeated dates.
    fn from_iter<I: IntoIterator<Item = CalendarRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        for record in iter {
            store.upsert(record);
        }
        store
    }
}
