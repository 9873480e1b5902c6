use crate::record::{CalendarRecord, HolidayObservation};
use crate::store::CalendarStore;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HolidayMergeStats {
    /// Observations applied to the store (`updated + inserted`).
    pub merged: usize,
    pub updated: usize,
    pub inserted: usize,
    /// Observations dropped because their date could not be parsed.
    pub skipped: usize,
}

/// Applies announced public holidays to the store.
///
/// An observation always wins over whatever the store holds for that date,
/// including the weekend sentinel and a differently named holiday.
pub struct HolidayMerge<'a> {
    observations: &'a [HolidayObservation],
}

impl<'a> HolidayMerge<'a> {
    pub fn new(observations: &'a [HolidayObservation]) -> Self {
        Self { observations }
    }

    pub fn execute(&self, store: &mut CalendarStore) -> HolidayMergeStats {
        let mut stats = HolidayMergeStats::default();
        if self.observations.is_empty() {
            info!("no new public holidays to merge");
            return stats;
        }

        for observation in self.observations {
            let Some(date) = observation.parsed_date() else {
                warn!(
                    date = %observation.date,
                    description = %observation.description,
                    "skipping holiday observation with unparseable date"
                );
                stats.skipped += 1;
                continue;
            };

            match store.find_mut(date) {
                Some(record) => {
                    record.mark_holiday(observation.description.clone());
                    stats.updated += 1;
                    debug!(%date, description = %observation.description, "updated holiday");
                }
                None => {
                    store.upsert(CalendarRecord::holiday(date, observation.description.clone()));
                    stats.inserted += 1;
                    debug!(%date, description = %observation.description, "added holiday");
                }
            }
            stats.merged += 1;
        }

        info!(
            merged = stats.merged,
            updated = stats.updated,
            inserted = stats.inserted,
            skipped = stats.skipped,
            "merged public holidays"
        );
        stats
    }
}
