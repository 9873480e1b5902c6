use chrono::NaiveDate;
use httpmock::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use trading_calendar::{
    CalendarRecord, CalendarStore, CsvCalendarRepository, CsvHolidaySource, HolidayObservation,
    HolidaySource, LoadOrigin, PersistenceError, Settings, SourceError, UpdateJob, ViewsJob,
    load_calendar_from_csv, save_calendar_to_csv,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn settings_in(dir: &Path) -> Settings {
    Settings {
        calendar_path: dir.join("trading_calendar.csv"),
        public_holidays_path: dir.join("only_public_holidays.csv"),
        non_trading_days_path: dir.join("public_and_weekly_holidays.csv"),
        earliest_year: 2024,
        ..Settings::default()
    }
}

fn seed_calendar() -> CalendarStore {
    CalendarStore::from_records(vec![
        CalendarRecord::trading(d(2025, 1, 2)),
        // Friday wrongly marked as trading
        CalendarRecord::trading(d(2025, 1, 3)),
        CalendarRecord::holiday(d(2025, 2, 21), "Language Martyrs' Day"),
        CalendarRecord::trading(d(2025, 2, 27)),
    ])
    .unwrap()
}

fn listing() -> CsvHolidaySource {
    CsvHolidaySource::from_observations(
        vec![
            HolidayObservation::new("2025-02-21", "Language Martyrs' Day"),
            HolidayObservation::new("2025-03-26", "Independence Day"),
        ],
        CsvHolidaySource::DEFAULT_PAGE_SIZE,
    )
}

struct ListingDown;

impl HolidaySource for ListingDown {
    fn fetch_page(&mut self, year: i32, page: u32) -> Result<Vec<HolidayObservation>, SourceError> {
        Err(SourceError::Unavailable {
            year,
            page,
            reason: "connection refused".into(),
        })
    }
}

#[test]
fn update_reconciles_and_persists_calendar() {
    let dir = tempdir().unwrap();
    let settings = settings_in(dir.path());
    save_calendar_to_csv(&seed_calendar(), &settings.calendar_path).unwrap();
    let repo = CsvCalendarRepository::new(&settings.calendar_path);
    let mut source = listing();

    let report = UpdateJob::new(&settings, &repo)
        .run(d(2025, 1, 15), Some(&mut source as &mut dyn HolidaySource))
        .unwrap();

    assert!(matches!(report.origin, LoadOrigin::Primary(_)));
    assert_eq!(report.years_scanned, vec![2025, 2024]);
    assert_eq!(report.summary.weekend.added, 15);
    assert_eq!(report.summary.weekend.corrected, 1);
    assert_eq!(report.summary.weekend.existing, 1);
    assert_eq!(report.summary.holidays.merged, 1);
    assert_eq!(
        report.commit_message,
        "Updated holiday calendar: 15 weekend(s) added, 1 weekend(s) corrected, 1 public holiday(s) added"
    );

    let saved = load_calendar_from_csv(&settings.calendar_path).unwrap();
    assert_eq!(saved.len(), 20);
    assert_eq!(report.records, 20);
    assert!(saved.find(d(2025, 1, 3)).unwrap().is_weekend());
    assert_eq!(
        saved.find(d(2025, 2, 21)).unwrap().name(),
        Some("Language Martyrs' Day")
    );
    assert_eq!(
        saved.find(d(2025, 3, 26)).unwrap().name(),
        Some("Independence Day")
    );
    // March is beyond the last month that was present before the run
    assert!(saved.find(d(2025, 3, 7)).is_none());
}

#[test]
fn second_update_reports_no_changes() {
    let dir = tempdir().unwrap();
    let settings = settings_in(dir.path());
    save_calendar_to_csv(&seed_calendar(), &settings.calendar_path).unwrap();
    let repo = CsvCalendarRepository::new(&settings.calendar_path);
    let job = UpdateJob::new(&settings, &repo);

    job.run(d(2025, 1, 15), None).unwrap();
    let first = fs::read_to_string(&settings.calendar_path).unwrap();
    let report = job.run(d(2025, 1, 15), None).unwrap();

    assert!(!report.summary.has_changes());
    assert_eq!(report.commit_message, "Holiday calendar checked - no changes needed");
    assert_eq!(fs::read_to_string(&settings.calendar_path).unwrap(), first);
}

#[test]
fn unavailable_listing_does_not_fail_the_run() {
    let dir = tempdir().unwrap();
    let settings = settings_in(dir.path());
    save_calendar_to_csv(&seed_calendar(), &settings.calendar_path).unwrap();
    let repo = CsvCalendarRepository::new(&settings.calendar_path);
    let mut source = ListingDown;

    let report = UpdateJob::new(&settings, &repo)
        .run(d(2025, 1, 15), Some(&mut source as &mut dyn HolidaySource))
        .unwrap();

    assert_eq!(report.source_failures, 2);
    assert_eq!(report.summary.holidays.merged, 0);
    assert_eq!(report.summary.weekend.added, 15);
}

#[test]
fn update_without_calendar_or_fallback_fails_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let settings = settings_in(dir.path());
    let repo = CsvCalendarRepository::new(&settings.calendar_path);

    let err = UpdateJob::new(&settings, &repo)
        .run(d(2025, 1, 15), None)
        .unwrap_err();

    assert!(matches!(err, PersistenceError::NotFound(_)));
    assert!(!settings.calendar_path.exists());
}

#[test]
fn update_bootstraps_from_remote_copy() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/trading_calendar.csv");
        then.status(200)
            .body("Date,IsTradingDay,HolidayName\n2025-01-30,True,\n2025-01-02,True,\n");
    });
    let dir = tempdir().unwrap();
    let mut settings = settings_in(dir.path());
    settings.fallback_url = Some(server.url("/trading_calendar.csv"));
    let repo = CsvCalendarRepository::new(&settings.calendar_path);

    let report = UpdateJob::new(&settings, &repo)
        .run(d(2025, 1, 15), None)
        .unwrap();

    assert!(matches!(report.origin, LoadOrigin::Fallback(_)));
    assert_eq!(report.summary.weekend.added, 9);
    let saved = load_calendar_from_csv(&settings.calendar_path).unwrap();
    assert_eq!(saved.len(), 11);
}

#[test]
fn range_that_ends_before_today_adds_no_weekends() {
    let dir = tempdir().unwrap();
    let settings = settings_in(dir.path());
    save_calendar_to_csv(&seed_calendar(), &settings.calendar_path).unwrap();
    let repo = CsvCalendarRepository::new(&settings.calendar_path);

    let report = UpdateJob::new(&settings, &repo)
        .run(d(2025, 6, 1), None)
        .unwrap();

    assert_eq!(report.summary.weekend.changed(), 0);
    assert!(report.summary.weekend.months.is_empty());
}

#[test]
fn views_job_writes_both_files() {
    let dir = tempdir().unwrap();
    let settings = settings_in(dir.path());
    let mut store = seed_calendar();
    store.upsert(CalendarRecord::weekend(d(2025, 1, 4)));
    save_calendar_to_csv(&store, &settings.calendar_path).unwrap();
    let repo = CsvCalendarRepository::new(&settings.calendar_path);

    let report = ViewsJob::new(&settings, &repo).run().unwrap();

    assert_eq!(report.public_holidays, 1);
    assert_eq!(report.non_trading_days, 2);
    assert_eq!(
        report.written,
        vec![
            settings.public_holidays_path.clone(),
            settings.non_trading_days_path.clone()
        ]
    );
    assert_eq!(
        fs::read_to_string(&settings.public_holidays_path).unwrap(),
        "Date,HolidayName\n2025-02-21,Language Martyrs' Day\n"
    );
    assert_eq!(
        fs::read_to_string(&settings.non_trading_days_path).unwrap(),
        "Date,HolidayName\n2025-02-21,Language Martyrs' Day\n2025-01-04,Weekend\n"
    );
}

#[test]
fn views_job_requires_a_calendar() {
    let dir = tempdir().unwrap();
    let settings = settings_in(dir.path());
    let repo = CsvCalendarRepository::new(&settings.calendar_path);

    let err = ViewsJob::new(&settings, &repo).run().unwrap_err();

    assert!(matches!(err, PersistenceError::NotFound(_)));
    assert!(!settings.public_holidays_path.exists());
}
