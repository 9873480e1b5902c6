pub mod holiday_merge;
pub mod weekend_pass;

pub use holiday_merge::{HolidayMerge, HolidayMergeStats};
pub use weekend_pass::{MonthWeekendStats, WeekendPass, WeekendStats};

use crate::calendar::{MonthRange, TradingWeek};
use crate::record::HolidayObservation;
use crate::store::CalendarStore;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub weekend: WeekendStats,
    pub holidays: HolidayMergeStats,
}

impl ReconcileSummary {
    pub fn has_changes(&self) -> bool {
        self.weekend.changed() > 0 || self.holidays.merged > 0
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("weekends_added={}", self.weekend.added));
        parts.push(format!("weekends_corrected={}", self.weekend.corrected));
        parts.push(format!("weekends_existing={}", self.weekend.existing));
        parts.push(format!("holidays_merged={}", self.holidays.merged));
        if self.holidays.skipped > 0 {
            parts.push(format!("holidays_skipped={}", self.holidays.skipped));
        }
        parts.join(", ")
    }
}

/// Weekend pass over `range`, then the holiday merge.
///
/// Takes every input explicitly; no clock, environment or I/O is touched.
pub fn reconcile(
    store: &mut CalendarStore,
    observations: &[HolidayObservation],
    range: MonthRange,
    week: &TradingWeek,
) -> ReconcileSummary {
    let weekend = WeekendPass::new(week).execute(store, range);
    let holidays = HolidayMerge::new(observations).execute(store);
    ReconcileSummary { weekend, holidays }
}
