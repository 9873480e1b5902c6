use crate::calendar::{TradingWeek, TradingWeekConfig};
use crate::source::{CollectionPlan, CsvHolidaySource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Everything a run needs to know about where data lives and how to treat it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_calendar_path")]
    pub calendar_path: PathBuf,
    #[serde(default)]
    pub fallback_url: Option<String>,
    #[serde(default = "default_public_holidays_path")]
    pub public_holidays_path: PathBuf,
    #[serde(default = "default_non_trading_days_path")]
    pub non_trading_days_path: PathBuf,
    #[serde(default)]
    pub weekend: TradingWeekConfig,
    /// CSV export of the holiday listing; no observations are collected without one.
    #[serde(default)]
    pub observations_path: Option<PathBuf>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_earliest_year")]
    pub earliest_year: i32,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub git: GitSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub workdir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calendar_path: default_calendar_path(),
            fallback_url: None,
            public_holidays_path: default_public_holidays_path(),
            non_trading_days_path: default_non_trading_days_path(),
            weekend: TradingWeekConfig::default(),
            observations_path: None,
            page_size: default_page_size(),
            earliest_year: default_earliest_year(),
            http_timeout_secs: default_http_timeout_secs(),
            git: GitSettings::default(),
        }
    }
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            push: false,
            remote: default_remote(),
            branch: default_branch(),
            workdir: None,
        }
    }
}

impl Settings {
    pub fn trading_week(&self) -> TradingWeek {
        TradingWeek::from_config(&self.weekend)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn collection_plan(&self, latest_year: i32) -> CollectionPlan {
        CollectionPlan::new(latest_year, self.earliest_year)
    }
}

fn default_calendar_path() -> PathBuf {
    PathBuf::from("data/trading_calendar.csv")
}

fn default_public_holidays_path() -> PathBuf {
    PathBuf::from("data/only_public_holidays.csv")
}

fn default_non_trading_days_path() -> PathBuf {
    PathBuf::from("data/public_and_weekly_holidays.csv")
}

fn default_page_size() -> usize {
    CsvHolidaySource::DEFAULT_PAGE_SIZE
}

fn default_earliest_year() -> i32 {
    CollectionPlan::DEFAULT_EARLIEST_YEAR
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}
