pub mod file;
pub mod remote;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    CsvCalendarRepository, load_calendar_from_csv, read_calendar, save_calendar_to_csv,
    save_view_to_csv, write_calendar,
};
pub use remote::RemoteCalendar;

use crate::store::CalendarStore;
use serde::Serialize;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not replace calendar file: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("storage lock poisoned")]
    LockPoisoned,
    #[error("calendar not found: {0}")]
    NotFound(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A place the full calendar can be loaded from and written back to.
///
/// `load_calendar` returns `Ok(None)` when nothing has been stored yet.
pub trait CalendarRepository {
    fn save_calendar(&self, store: &CalendarStore) -> PersistenceResult<()>;
    fn load_calendar(&self) -> PersistenceResult<Option<CalendarStore>>;
    fn describe(&self) -> String;
    /// File a save writes to.
    fn path(&self) -> &Path;
}

/// Where a loaded calendar came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LoadOrigin {
    Primary(String),
    Fallback(String),
}

/// Loads from the primary repository, falling back to a remote copy.
pub struct CalendarLoader<'a> {
    primary: &'a dyn CalendarRepository,
    fallback: Option<&'a RemoteCalendar>,
}

impl<'a> CalendarLoader<'a> {
    pub fn new(primary: &'a dyn CalendarRepository) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Option<&'a RemoteCalendar>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn load(&self) -> PersistenceResult<(CalendarStore, LoadOrigin)> {
        if let Some(store) = self.primary.load_calendar()? {
            info!(source = %self.primary.describe(), records = store.len(), "loaded calendar");
            return Ok((store, LoadOrigin::Primary(self.primary.describe())));
        }

        let Some(remote) = self.fallback else {
            return Err(PersistenceError::NotFound(format!(
                "{} does not exist and no fallback is configured",
                self.primary.describe()
            )));
        };

        let body = match remote.fetch() {
            Ok(Some(body)) => body,
            Ok(None) => {
                return Err(PersistenceError::NotFound(format!(
                    "{} does not exist and {} returned not found",
                    self.primary.describe(),
                    remote.url()
                )));
            }
            Err(err) => {
                warn!(url = %remote.url(), error = %err, "fallback calendar unreachable");
                return Err(PersistenceError::NotFound(format!(
                    "{} does not exist and {} is unreachable: {err}",
                    self.primary.describe(),
                    remote.url()
                )));
            }
        };

        let store = file::read_calendar(body.as_bytes())?;
        info!(url = %remote.url(), records = store.len(), "fetched calendar from fallback");
        Ok((store, LoadOrigin::Fallback(remote.url().to_string())))
    }
}
