//! Batch runs: the calendar update and the derived-view refresh.
//!
//! Clock, configuration and I/O are resolved here; the passes take none
//! of them.

use crate::calculations::{HolidayMerge, ReconcileSummary, WeekendPass, WeekendStats};
use crate::calendar::{MonthRange, YearMonth};
use crate::config::Settings;
use crate::persistence::{
    CalendarLoader, CalendarRepository, LoadOrigin, PersistenceError, PersistenceResult,
    RemoteCalendar, save_view_to_csv,
};
use crate::publish::commit_message;
use crate::source::{CollectOutcome, ExistingHolidays, HolidaySource, collect_new_observations};
use crate::views::{all_non_trading_days, public_holidays_only};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub origin: LoadOrigin,
    pub range: Option<(YearMonth, YearMonth)>,
    pub years_scanned: Vec<i32>,
    pub source_failures: usize,
    pub summary: ReconcileSummary,
    pub records: usize,
    pub commit_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewsReport {
    pub public_holidays: usize,
    pub non_trading_days: usize,
    pub written: Vec<PathBuf>,
}

/// Load, reconcile and persist the calendar.
pub struct UpdateJob<'a> {
    settings: &'a Settings,
    repository: &'a dyn CalendarRepository,
}

impl<'a> UpdateJob<'a> {
    pub fn new(settings: &'a Settings, repository: &'a dyn CalendarRepository) -> Self {
        Self {
            settings,
            repository,
        }
    }

    /// Runs against `today`. Source problems only reduce the observations
    /// collected; load and save failures abort the run.
    pub fn run(
        &self,
        today: NaiveDate,
        source: Option<&mut dyn HolidaySource>,
    ) -> PersistenceResult<RunReport> {
        let remote = self
            .settings
            .fallback_url
            .as_ref()
            .map(|url| RemoteCalendar::new(url.clone()).with_timeout(self.settings.http_timeout()));
        let (mut store, origin) = CalendarLoader::new(self.repository)
            .with_fallback(remote.as_ref())
            .load()?;

        let range = store
            .last_date()
            .map(|last| MonthRange::between(today, last));
        if let Some(range) = range {
            info!(
                first = ?store.first_date(),
                last = ?store.last_date(),
                from = %range.start,
                to = %range.end,
                "calendar date range"
            );
        }

        let week = self.settings.trading_week();
        let weekend = match range {
            Some(range) => WeekendPass::new(&week).execute(&mut store, range),
            None => WeekendStats::default(),
        };

        // Snapshot includes the weekends marked above.
        let collected = match (source, store.last_date()) {
            (Some(source), Some(last)) => {
                let mut existing = ExistingHolidays::from_store(&store);
                let plan = self.settings.collection_plan(last.year());
                collect_new_observations(source, &mut existing, &plan)
            }
            _ => CollectOutcome::default(),
        };

        let holidays = HolidayMerge::new(&collected.observations).execute(&mut store);
        let summary = ReconcileSummary { weekend, holidays };

        self.repository.save_calendar(&store)?;

        let report = RunReport {
            origin,
            range: range.map(|r| (r.start, r.end)),
            years_scanned: collected.years_scanned,
            source_failures: collected.failures,
            commit_message: commit_message(&summary),
            records: store.len(),
            summary,
        };
        info!(
            records = report.records,
            summary = %report.summary.to_cli_summary(),
            "calendar update complete"
        );
        Ok(report)
    }
}

/// Rebuild both derived views from the persisted calendar.
pub struct ViewsJob<'a> {
    settings: &'a Settings,
    repository: &'a dyn CalendarRepository,
}

impl<'a> ViewsJob<'a> {
    pub fn new(settings: &'a Settings, repository: &'a dyn CalendarRepository) -> Self {
        Self {
            settings,
            repository,
        }
    }

    pub fn run(&self) -> PersistenceResult<ViewsReport> {
        let store = self
            .repository
            .load_calendar()?
            .ok_or_else(|| PersistenceError::NotFound(self.repository.describe()))?;

        let public = public_holidays_only(&store);
        let all = all_non_trading_days(&store);
        save_view_to_csv(&public, &self.settings.public_holidays_path)?;
        save_view_to_csv(&all, &self.settings.non_trading_days_path)?;

        Ok(ViewsReport {
            public_holidays: public.len(),
            non_trading_days: all.len(),
            written: vec![
                self.settings.public_holidays_path.clone(),
                self.settings.non_trading_days_path.clone(),
            ],
        })
    }
}
