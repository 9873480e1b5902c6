#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use trading_calendar::{
    CalendarRecord, CalendarRepository, CalendarStore, SqliteCalendarRepository,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn sqlite_store_round_trip_calendar() {
    let store = CalendarStore::from_records(vec![
        CalendarRecord::trading(d(2024, 3, 7)),
        CalendarRecord::holiday(d(2024, 3, 8), "International Women's Day"),
        CalendarRecord::weekend(d(2024, 3, 9)),
    ])
    .unwrap();

    let tmp = NamedTempFile::new().expect("temp db");
    let repo = SqliteCalendarRepository::new(tmp.path()).expect("open sqlite");
    repo.save_calendar(&store).expect("save calendar");

    let loaded = repo.load_calendar().expect("load calendar").expect("calendar present");
    assert_eq!(loaded, store);
}

#[test]
fn sqlite_empty_database_loads_as_none() {
    let tmp = NamedTempFile::new().expect("temp db");
    let repo = SqliteCalendarRepository::new(tmp.path()).expect("open sqlite");
    assert!(repo.load_calendar().unwrap().is_none());
    assert!(repo.describe().starts_with("sqlite:"));
    assert_eq!(repo.path(), tmp.path());
}

#[test]
fn sqlite_save_overwrites_previous_calendar() {
    let tmp = NamedTempFile::new().expect("temp db");
    let repo = SqliteCalendarRepository::new(tmp.path()).expect("open sqlite");

    let first = CalendarStore::from_records(vec![
        CalendarRecord::trading(d(2024, 1, 2)),
        CalendarRecord::trading(d(2024, 1, 3)),
    ])
    .unwrap();
    repo.save_calendar(&first).unwrap();

    let second =
        CalendarStore::from_records(vec![CalendarRecord::weekend(d(2024, 1, 5))]).unwrap();
    repo.save_calendar(&second).unwrap();

    let loaded = repo.load_calendar().unwrap().unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.find(d(2024, 1, 5)).unwrap().is_weekend());
}
