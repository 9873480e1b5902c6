use chrono::NaiveDate;
use trading_calendar::{
    CalendarRecord, CalendarStore, MonthRange, TradingWeek, WEEKEND_SENTINEL, WeekendPass,
    YearMonth,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> MonthRange {
    let ym = YearMonth::new(y, m).unwrap();
    MonthRange::new(ym, ym)
}

#[test]
fn trading_friday_is_corrected_to_weekend() {
    let mut store = CalendarStore::from_records(vec![CalendarRecord::trading(d(2024, 1, 5))]).unwrap();
    let week = TradingWeek::default();

    let stats = WeekendPass::new(&week).execute(&mut store, month(2024, 1));

    let record = store.find(d(2024, 1, 5)).unwrap();
    assert!(!record.is_trading_day);
    assert_eq!(record.name(), Some(WEEKEND_SENTINEL));
    assert_eq!(stats.corrected, 1);
    // the other seven Fri/Sat dates of January 2024 were missing
    assert_eq!(stats.added, 7);
    assert_eq!(stats.existing, 0);
}

#[test]
fn missing_saturday_is_added() {
    let mut store = CalendarStore::new();
    let week = TradingWeek::default();

    let stats = WeekendPass::new(&week).execute(&mut store, month(2024, 1));

    let record = store.find(d(2024, 1, 13)).unwrap();
    assert!(!record.is_trading_day);
    assert_eq!(record.name(), Some(WEEKEND_SENTINEL));
    assert_eq!(stats.added, 8);
    assert_eq!(store.len(), 8);
}

#[test]
fn named_holiday_on_friday_is_left_alone() {
    let mut store = CalendarStore::from_records(vec![CalendarRecord::holiday(
        d(2024, 3, 8),
        "International Women's Day",
    )])
    .unwrap();
    let week = TradingWeek::default();

    let stats = WeekendPass::new(&week).execute(&mut store, month(2024, 3));

    assert_eq!(
        store.find(d(2024, 3, 8)).unwrap().name(),
        Some("International Women's Day")
    );
    assert_eq!(stats.existing, 1);
    assert_eq!(stats.corrected, 0);
    assert_eq!(stats.added, 9);
}

#[test]
fn blank_non_trading_day_is_filled_with_weekend() {
    let mut store = CalendarStore::from_records(vec![CalendarRecord {
        date: d(2024, 1, 6),
        is_trading_day: false,
        holiday_name: None,
    }])
    .unwrap();
    let week = TradingWeek::default();

    let stats = WeekendPass::new(&week).execute(&mut store, month(2024, 1));

    assert!(store.find(d(2024, 1, 6)).unwrap().is_weekend());
    assert_eq!(stats.corrected, 1);
}

#[test]
fn second_run_over_same_range_changes_nothing() {
    let mut store = CalendarStore::from_records(vec![
        CalendarRecord::trading(d(2024, 1, 5)),
        CalendarRecord::trading(d(2024, 1, 8)),
    ])
    .unwrap();
    let week = TradingWeek::default();
    let range = MonthRange::new(YearMonth::new(2024, 1).unwrap(), YearMonth::new(2024, 2).unwrap());
    let pass = WeekendPass::new(&week);

    let first = pass.execute(&mut store, range);
    let snapshot = store.clone();
    let second = pass.execute(&mut store, range);

    assert_eq!(first.changed(), 16);
    assert_eq!(second.added, 0);
    assert_eq!(second.corrected, 0);
    assert_eq!(second.existing, 16);
    assert_eq!(store, snapshot);
}

#[test]
fn weekdays_outside_weekend_are_untouched() {
    let mut store = CalendarStore::from_records(vec![CalendarRecord::trading(d(2024, 1, 8))]).unwrap();
    let week = TradingWeek::default();

    WeekendPass::new(&week).execute(&mut store, month(2024, 1));

    assert!(store.find(d(2024, 1, 8)).unwrap().is_trading_day);
}

#[test]
fn per_month_stats_sum_to_totals_across_year_end() {
    let mut store = CalendarStore::new();
    let week = TradingWeek::default();
    let range = MonthRange::between(d(2024, 12, 15), d(2025, 1, 2));

    let stats = WeekendPass::new(&week).execute(&mut store, range);

    assert_eq!(stats.months.len(), 2);
    assert_eq!(stats.months[0].month, YearMonth::new(2024, 12).unwrap());
    assert_eq!(stats.months[0].added, 8);
    assert_eq!(stats.months[1].added, 9);
    assert_eq!(stats.added, 17);
    // the whole month is covered even though the range ends on the 2nd
    assert!(store.find(d(2025, 1, 31)).unwrap().is_weekend());
}

#[test]
fn empty_range_processes_nothing() {
    let mut store = CalendarStore::new();
    let week = TradingWeek::default();
    let range = MonthRange::between(d(2025, 6, 1), d(2025, 3, 1));

    let stats = WeekendPass::new(&week).execute(&mut store, range);

    assert!(stats.months.is_empty());
    assert!(store.is_empty());
}

#[test]
fn custom_week_marks_sunday() {
    let mut store = CalendarStore::new();
    let week = TradingWeek::saturday_sunday();

    WeekendPass::new(&week).execute(&mut store, month(2024, 1));

    assert!(store.find(d(2024, 1, 7)).is_some());
    assert!(store.find(d(2024, 1, 5)).is_none());
}
