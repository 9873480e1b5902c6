pub mod calculations;
pub mod calendar;
pub mod config;
pub mod job;
pub mod persistence;
pub mod publish;
pub mod record;
pub mod source;
pub mod store;
pub mod views;

pub use calculations::{
    HolidayMerge, HolidayMergeStats, MonthWeekendStats, ReconcileSummary, WeekendPass,
    WeekendStats, reconcile,
};
pub use calendar::{MonthRange, TradingWeek, TradingWeekConfig, YearMonth};
pub use config::{GitSettings, Settings};
pub use job::{RunReport, UpdateJob, ViewsJob, ViewsReport};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteCalendarRepository;
pub use persistence::{
    CalendarLoader, CalendarRepository, CsvCalendarRepository, LoadOrigin, PersistenceError,
    PersistenceResult, RemoteCalendar, load_calendar_from_csv, save_calendar_to_csv,
    save_view_to_csv,
};
pub use publish::{GitPublisher, PublishError, commit_message, view_commit_message};
pub use record::{CalendarRecord, HolidayObservation, WEEKEND_SENTINEL};
pub use source::{
    CollectOutcome, CollectionPlan, CsvHolidaySource, ExistingHolidays, HolidaySource,
    SourceError, collect_new_observations,
};
pub use store::CalendarStore;
pub use views::{DerivedView, ViewKind, ViewRow, all_non_trading_days, public_holidays_only};
