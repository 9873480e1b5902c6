use super::{CalendarRepository, PersistenceError, PersistenceResult};
use crate::record::{CalendarRecord, format_calendar_date, parse_calendar_date};
use crate::store::CalendarStore;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The calendar as a single SQLite table, rewritten in one transaction on save.
pub struct SqliteCalendarRepository {
    path: PathBuf,
    connection: Mutex<Connection>,
}

impl SqliteCalendarRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path.as_ref())?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS trading_calendar (
                date TEXT PRIMARY KEY,
                is_trading_day INTEGER NOT NULL,
                holiday_name TEXT
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

impl CalendarRepository for SqliteCalendarRepository {
    fn save_calendar(&self, store: &CalendarStore) -> PersistenceResult<()> {
        let mut conn = self
            .connection
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM trading_calendar", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO trading_calendar (date, is_trading_day, holiday_name) VALUES (?1, ?2, ?3)",
            )?;
            for record in store.iter_desc() {
                stmt.execute(params![
                    format_calendar_date(record.date),
                    record.is_trading_day,
                    record.name()
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_calendar(&self) -> PersistenceResult<Option<CalendarStore>> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)?;

        let mut stmt = conn.prepare(
            "SELECT date, is_trading_day, holiday_name FROM trading_calendar ORDER BY date DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, bool>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut store = CalendarStore::new();
        for row in rows {
            let (date, is_trading_day, holiday_name) = row?;
            let date = parse_calendar_date(&date)
                .ok_or_else(|| PersistenceError::InvalidData(format!("invalid date '{date}'")))?;
            store.upsert(CalendarRecord {
                date,
                is_trading_day,
                holiday_name,
            });
        }

        if store.is_empty() {
            return Ok(None);
        }
        Ok(Some(store))
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
