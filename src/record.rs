use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reserved holiday name for non-trading days caused by the weekly schedule.
pub const WEEKEND_SENTINEL: &str = "Weekend";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub date: NaiveDate,
    pub is_trading_day: bool,
    pub holiday_name: Option<String>,
}

impl CalendarRecord {
    pub fn trading(date: NaiveDate) -> Self {
        Self {
            date,
            is_trading_day: true,
            holiday_name: None,
        }
    }

    pub fn weekend(date: NaiveDate) -> Self {
        Self {
            date,
            is_trading_day: false,
            holiday_name: Some(WEEKEND_SENTINEL.to_string()),
        }
    }

    pub fn holiday(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            is_trading_day: false,
            holiday_name: Some(name.into()),
        }
    }

    /// Holiday name with empty strings folded into `None`.
    pub fn name(&self) -> Option<&str> {
        self.holiday_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    pub fn is_weekend(&self) -> bool {
        self.name() == Some(WEEKEND_SENTINEL)
    }

    /// Non-trading day carrying a real holiday name (anything but the weekend sentinel).
    pub fn is_public_holiday(&self) -> bool {
        !self.is_trading_day && self.name().is_some_and(|name| name != WEEKEND_SENTINEL)
    }

    pub fn mark_weekend(&mut self) {
        self.is_trading_day = false;
        self.holiday_name = Some(WEEKEND_SENTINEL.to_string());
    }

    pub fn mark_holiday(&mut self, name: impl Into<String>) {
        self.is_trading_day = false;
        self.holiday_name = Some(name.into());
    }
}

/// An announced public holiday as reported by an external listing.
///
/// The date is kept verbatim; it is parsed when the observation is merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolidayObservation {
    #[serde(rename = "Holiday Date")]
    pub date: String,
    #[serde(rename = "Holiday Description")]
    pub description: String,
}

impl HolidayObservation {
    pub fn new(date: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            date: date.into().trim().to_string(),
            description: description.into().trim().to_string(),
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses `YYYY-MM-DD`, tolerating a trailing midnight time component.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .ok()
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
