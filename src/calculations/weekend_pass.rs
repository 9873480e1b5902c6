use crate::calendar::{MonthRange, TradingWeek, YearMonth};
use crate::record::CalendarRecord;
use crate::store::CalendarStore;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWeekendStats {
    pub month: YearMonth,
    pub added: usize,
    pub corrected: usize,
    pub existing: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekendStats {
    pub months: Vec<MonthWeekendStats>,
    pub added: usize,
    pub corrected: usize,
    pub existing: usize,
}

impl WeekendStats {
    fn push(&mut self, month: MonthWeekendStats) {
        self.added += month.added;
        self.corrected += month.corrected;
        self.existing += month.existing;
        self.months.push(month);
    }

    pub fn changed(&self) -> usize {
        self.added + self.corrected
    }
}

/// Marks every weekend day in a month range as a non-trading "Weekend",
/// leaving named public holidays alone.
pub struct WeekendPass<'a> {
    week: &'a TradingWeek,
}

impl<'a> WeekendPass<'a> {
    pub fn new(week: &'a TradingWeek) -> Self {
        Self { week }
    }

    pub fn execute(&self, store: &mut CalendarStore, range: MonthRange) -> WeekendStats {
        let mut stats = WeekendStats::default();
        for month in range.months() {
            stats.push(self.process_month(store, month));
        }
        info!(
            added = stats.added,
            corrected = stats.corrected,
            existing = stats.existing,
            months = stats.months.len(),
            "weekend processing complete"
        );
        stats
    }

    pub fn process_month(&self, store: &mut CalendarStore, month: YearMonth) -> MonthWeekendStats {
        let mut stats = MonthWeekendStats {
            month,
            added: 0,
            corrected: 0,
            existing: 0,
        };

        for date in self.week.weekend_days_in_month(month) {
            match store.find_mut(date) {
                None => {
                    store.upsert(CalendarRecord::weekend(date));
                    stats.added += 1;
                    debug!(%date, "added weekend");
                }
                Some(record) if record.is_trading_day => {
                    record.mark_weekend();
                    stats.corrected += 1;
                    debug!(%date, "corrected trading day to weekend");
                }
                Some(record) => match record.name() {
                    None => {
                        record.mark_weekend();
                        stats.corrected += 1;
                        debug!(%date, "filled blank non-trading day as weekend");
                    }
                    // Either already "Weekend" or a public holiday, which wins.
                    Some(_) => stats.existing += 1,
                },
            }
        }

        info!(
            month = %month,
            existing = stats.existing,
            added = stats.added,
            corrected = stats.corrected,
            "processed weekends for month"
        );
        stats
    }
}
