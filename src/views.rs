//! Read-only projections of a reconciled calendar.
//!
//! Views are rebuilt from the store on every call and never cached.

use crate::record::{CalendarRecord, WEEKEND_SENTINEL};
use crate::store::CalendarStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    PublicHolidaysOnly,
    AllNonTradingDays,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::PublicHolidaysOnly => "public_holidays_only",
            ViewKind::AllNonTradingDays => "all_non_trading_days",
        }
    }

    fn includes(&self, record: &CalendarRecord) -> bool {
        if record.is_trading_day {
            return false;
        }
        match self {
            ViewKind::PublicHolidaysOnly => record.name() != Some(WEEKEND_SENTINEL),
            ViewKind::AllNonTradingDays => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRow {
    pub date: NaiveDate,
    pub holiday_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedView {
    pub kind: ViewKind,
    pub rows: Vec<ViewRow>,
}

impl DerivedView {
    pub fn build(kind: ViewKind, store: &CalendarStore) -> Self {
        let mut rows: Vec<ViewRow> = store
            .iter()
            .filter(|record| kind.includes(record))
            .map(|record| ViewRow {
                date: record.date,
                holiday_name: record.name().unwrap_or_default().to_string(),
            })
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Self { kind, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|row| row.date).collect()
    }
}

/// Non-trading days with a real holiday name, newest first.
pub fn public_holidays_only(store: &CalendarStore) -> DerivedView {
    DerivedView::build(ViewKind::PublicHolidaysOnly, store)
}

/// Every non-trading day, weekends included, newest first.
pub fn all_non_trading_days(store: &CalendarStore) -> DerivedView {
    DerivedView::build(ViewKind::AllNonTradingDays, store)
}
