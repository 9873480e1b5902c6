//! Collaborator boundary for announced public holidays.
//!
//! The crate does not implement any listing transport. A [`HolidaySource`]
//! hands out one page of a per-year listing at a time, and
//! [`collect_new_observations`] decides which years and pages to read and
//! which rows are new.

use crate::record::{HolidayObservation, format_calendar_date};
use crate::store::CalendarStore;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod csv_file;

pub use csv_file::CsvHolidaySource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("year {year} page {page} unavailable: {reason}")]
    Unavailable { year: i32, page: u32, reason: String },
}

pub trait HolidaySource {
    /// Number of listing pages published for `year`.
    fn page_count(&self, _year: i32) -> u32 {
        1
    }

    /// One page of the listing, 1-based. An empty page means the year is exhausted.
    fn fetch_page(&mut self, year: i32, page: u32) -> Result<Vec<HolidayObservation>, SourceError>;
}

/// `(date, holiday name)` pairs already known before collection starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingHolidays {
    pairs: HashSet<(String, String)>,
}

impl ExistingHolidays {
    pub fn from_store(store: &CalendarStore) -> Self {
        Self {
            pairs: store.existing_holidays(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, observation: &HolidayObservation) -> bool {
        self.pairs.contains(&Self::key(observation))
    }

    /// Records the observation, returning `true` if it was not known yet.
    pub fn insert(&mut self, observation: &HolidayObservation) -> bool {
        self.pairs.insert(Self::key(observation))
    }

    fn key(observation: &HolidayObservation) -> (String, String) {
        let date = observation
            .parsed_date()
            .map(format_calendar_date)
            .unwrap_or_else(|| observation.date.clone());
        (date, observation.description.clone())
    }
}

/// Years to walk, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionPlan {
    pub latest_year: i32,
    pub earliest_year: i32,
}

impl CollectionPlan {
    pub const DEFAULT_EARLIEST_YEAR: i32 = 2007;

    pub fn new(latest_year: i32, earliest_year: i32) -> Self {
        Self {
            latest_year,
            earliest_year,
        }
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        (self.earliest_year..=self.latest_year).rev()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectOutcome {
    pub observations: Vec<HolidayObservation>,
    pub years_scanned: Vec<i32>,
    pub failures: usize,
}

/// Walks the listing from the newest year backwards and keeps unseen rows.
///
/// - a year stops at its first empty page, or when page 1 has nothing new;
/// - a failed first page skips the year, a failed later page ends it;
/// - the second year is always visited; after that, a year with nothing new
///   ends the walk.
pub fn collect_new_observations(
    source: &mut dyn HolidaySource,
    existing: &mut ExistingHolidays,
    plan: &CollectionPlan,
) -> CollectOutcome {
    let mut outcome = CollectOutcome::default();

    for (idx, year) in plan.years().enumerate() {
        outcome.years_scanned.push(year);
        let max_pages = source.page_count(year).max(1);
        let mut year_new = Vec::new();
        let mut year_skipped = false;

        for page in 1..=max_pages {
            let rows = match source.fetch_page(year, page) {
                Ok(rows) => rows,
                Err(err) => {
                    warn!(year, page, error = %err, "holiday listing page failed");
                    outcome.failures += 1;
                    year_skipped = page == 1;
                    break;
                }
            };

            if rows.is_empty() {
                debug!(year, page, "empty listing page, stopping year");
                break;
            }

            let before = year_new.len();
            for row in rows {
                if existing.insert(&row) {
                    year_new.push(row);
                }
            }
            let found = year_new.len() - before;

            if found == 0 {
                debug!(year, page, "no new entries on page");
                if page == 1 {
                    break;
                }
            } else {
                info!(year, page, found, "found new holidays");
            }
        }

        if year_skipped {
            continue;
        }

        let year_found = year_new.len();
        outcome.observations.extend(year_new);

        if idx == 0 {
            continue;
        }
        if year_found == 0 {
            info!(year, "no new entries, stopping earlier years");
            break;
        }
    }

    outcome
}
