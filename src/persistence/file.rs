use super::{CalendarRepository, PersistenceError, PersistenceResult};
use crate::record::{CalendarRecord, format_calendar_date, parse_calendar_date};
use crate::store::CalendarStore;
use crate::views::DerivedView;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
struct CalendarCsvRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "IsTradingDay")]
    is_trading_day: String,
    #[serde(rename = "HolidayName", default)]
    holiday_name: String,
}

impl From<&CalendarRecord> for CalendarCsvRecord {
    fn from(record: &CalendarRecord) -> Self {
        Self {
            date: format_calendar_date(record.date),
            is_trading_day: format_bool(record.is_trading_day),
            holiday_name: record.name().unwrap_or_default().to_string(),
        }
    }
}

impl CalendarCsvRecord {
    fn into_record(self, line: usize) -> PersistenceResult<CalendarRecord> {
        let date = parse_calendar_date(&self.date).ok_or_else(|| {
            PersistenceError::InvalidData(format!("line {line}: invalid date '{}'", self.date))
        })?;
        let is_trading_day = parse_bool(&self.is_trading_day)
            .map_err(|msg| PersistenceError::InvalidData(format!("line {line}: {msg}")))?;
        Ok(CalendarRecord {
            date,
            is_trading_day,
            holiday_name: parse_string_option(self.holiday_name),
        })
    }
}

#[derive(Debug, Serialize)]
struct ViewCsvRecord<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "HolidayName")]
    holiday_name: &'a str,
}

/// Parses a `Date,IsTradingDay,HolidayName` table.
///
/// Any malformed row fails the whole read, as does a repeated date.
pub fn read_calendar<R: Read>(reader: R) -> PersistenceResult<CalendarStore> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<CalendarCsvRecord>().enumerate() {
        // header is line 1
        records.push(row?.into_record(idx + 2)?);
    }

    CalendarStore::from_records(records).map_err(|date| {
        PersistenceError::InvalidData(format!(
            "duplicate date {}",
            format_calendar_date(date)
        ))
    })
}

/// Writes the calendar newest first.
pub fn write_calendar<W: Write>(store: &CalendarStore, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in store.iter_desc() {
        writer.serialize(CalendarCsvRecord::from(record))?;
    }
    // An empty store still gets a header row.
    if store.is_empty() {
        writer.write_record(["Date", "IsTradingDay", "HolidayName"])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_calendar_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<CalendarStore> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PersistenceError::NotFound(path.display().to_string()));
    }
    read_calendar(File::open(path)?)
}

/// Replaces `path` with the calendar via a temporary file in the same directory.
pub fn save_calendar_to_csv<P: AsRef<Path>>(store: &CalendarStore, path: P) -> PersistenceResult<()> {
    let path = path.as_ref();
    write_atomically(path, |file| write_calendar(store, file))?;
    info!(path = %path.display(), records = store.len(), "saved calendar");
    Ok(())
}

pub fn save_view_to_csv<P: AsRef<Path>>(view: &DerivedView, path: P) -> PersistenceResult<()> {
    let path = path.as_ref();
    write_atomically(path, |file| {
        let mut writer = csv::Writer::from_writer(file);
        for row in &view.rows {
            writer.serialize(ViewCsvRecord {
                date: format_calendar_date(row.date),
                holiday_name: &row.holiday_name,
            })?;
        }
        if view.is_empty() {
            writer.write_record(["Date", "HolidayName"])?;
        }
        writer.flush()?;
        Ok(())
    })?;
    info!(
        path = %path.display(),
        view = view.kind.as_str(),
        rows = view.len(),
        "saved derived view"
    );
    Ok(())
}

fn write_atomically<F>(path: &Path, write: F) -> PersistenceResult<()>
where
    F: FnOnce(&mut File) -> PersistenceResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    write(tmp.as_file_mut())?;
    let fresh = tmp.as_file().metadata()?.permissions();
    tmp.as_file().set_permissions(target_permissions(path, fresh)?)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// Permissions the replaced file should end up with: the current target's,
/// or world-readable for a new file. Temp files are created owner-only.
fn target_permissions(path: &Path, fresh: fs::Permissions) -> PersistenceResult<fs::Permissions> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.permissions()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(readable(fresh)),
        Err(err) => Err(err.into()),
    }
}

#[cfg(unix)]
fn readable(mut permissions: fs::Permissions) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    permissions.set_mode(0o644);
    permissions
}

#[cfg(not(unix))]
fn readable(permissions: fs::Permissions) -> fs::Permissions {
    permissions
}

/// The calendar as a CSV file on local disk.
#[derive(Debug, Clone)]
pub struct CsvCalendarRepository {
    path: PathBuf,
}

impl CsvCalendarRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl CalendarRepository for CsvCalendarRepository {
    fn save_calendar(&self, store: &CalendarStore) -> PersistenceResult<()> {
        save_calendar_to_csv(store, &self.path)
    }

    fn load_calendar(&self) -> PersistenceResult<Option<CalendarStore>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_calendar_from_csv(&self.path).map(Some)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

fn format_bool(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

fn parse_bool(input: &str) -> Result<bool, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!("invalid boolean '{other}'")),
    }
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.trim().to_string())
    }
}
