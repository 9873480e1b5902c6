use super::{HolidaySource, SourceError};
use crate::record::HolidayObservation;
use chrono::Datelike;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::warn;

/// Holiday listing read from a `Holiday Date,Holiday Description` CSV export,
/// served per year in fixed-size pages.
#[derive(Debug, Clone)]
pub struct CsvHolidaySource {
    by_year: BTreeMap<i32, Vec<HolidayObservation>>,
    page_size: usize,
}

impl CsvHolidaySource {
    pub const DEFAULT_PAGE_SIZE: usize = 20;

    pub fn open<P: AsRef<Path>>(path: P, page_size: usize) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);
        let mut observations = Vec::new();
        for row in reader.deserialize::<HolidayObservation>() {
            let row = row?;
            observations.push(HolidayObservation::new(row.date, row.description));
        }
        Ok(Self::from_observations(observations, page_size))
    }

    pub fn from_observations<I>(observations: I, page_size: usize) -> Self
    where
        I: IntoIterator<Item = HolidayObservation>,
    {
        let mut by_year: BTreeMap<i32, Vec<HolidayObservation>> = BTreeMap::new();
        for observation in observations {
            match observation.parsed_date() {
                Some(date) => by_year.entry(date.year()).or_default().push(observation),
                None => warn!(date = %observation.date, "dropping listing row with unparseable date"),
            }
        }
        Self {
            by_year,
            page_size: page_size.max(1),
        }
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }
}

impl HolidaySource for CsvHolidaySource {
    fn page_count(&self, year: i32) -> u32 {
        let rows = self.by_year.get(&year).map_or(0, Vec::len);
        let pages = rows.div_ceil(self.page_size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    fn fetch_page(&mut self, year: i32, page: u32) -> Result<Vec<HolidayObservation>, SourceError> {
        if page == 0 {
            return Err(SourceError::Unavailable {
                year,
                page,
                reason: "pages are numbered from 1".into(),
            });
        }
        let Some(rows) = self.by_year.get(&year) else {
            return Ok(Vec::new());
        };
        let start = (page as usize - 1) * self.page_size;
        Ok(rows
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect())
    }
}
