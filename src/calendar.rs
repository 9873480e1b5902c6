use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Weekly trading pattern: which weekdays the exchange never trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingWeek {
    weekend_days: HashSet<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingWeekConfig {
    weekend_days: Vec<Weekday>,
}

impl Default for TradingWeek {
    fn default() -> Self {
        Self::friday_saturday()
    }
}

impl TradingWeek {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn friday_saturday() -> Self {
        Self::with_weekend([Weekday::Fri, Weekday::Sat])
    }

    pub fn saturday_sunday() -> Self {
        Self::with_weekend([Weekday::Sat, Weekday::Sun])
    }

    pub fn with_weekend<I>(weekend_days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        Self {
            weekend_days: weekend_days.into_iter().collect(),
        }
    }

    pub fn from_config(config: &TradingWeekConfig) -> Self {
        Self::with_weekend(config.weekend_days.iter().copied())
    }

    pub fn to_config(&self) -> TradingWeekConfig {
        TradingWeekConfig::from(self)
    }

    /// Set the days the exchange trades; every other weekday becomes weekend.
    pub fn set_trading_days(&mut self, days: &[Weekday]) {
        self.weekend_days.clear();
        for day in Self::ALL_WEEKDAYS {
            if !days.contains(&day) {
                self.weekend_days.insert(day);
            }
        }
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend_days.contains(&date.weekday())
    }

    /// Weekend dates between `start` and `end`, inclusive.
    pub fn weekend_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.is_weekend(current) {
                days.push(current);
            }
            current = current + Duration::days(1);
        }
        days
    }

    pub fn weekend_days_in_month(&self, month: YearMonth) -> Vec<NaiveDate> {
        self.weekend_days_in_range(month.first_day(), month.last_day())
    }
}

impl TradingWeekConfig {
    pub fn new<I>(weekend_days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        let mut days: Vec<Weekday> = weekend_days.into_iter().collect();
        days.sort_by_key(|wd| wd.num_days_from_monday());
        days.dedup_by(|a, b| a.num_days_from_monday() == b.num_days_from_monday());
        Self { weekend_days: days }
    }

    /// Parses a comma separated list such as `"Fri,Sat"` or `"friday, saturday"`.
    pub fn parse(input: &str) -> Result<Self, chrono::ParseWeekdayError> {
        let days = input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<Weekday>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(days))
    }

    pub fn weekend_days(&self) -> &[Weekday] {
        &self.weekend_days
    }
}

impl Default for TradingWeekConfig {
    fn default() -> Self {
        TradingWeekConfig::from(&TradingWeek::default())
    }
}

impl From<&TradingWeek> for TradingWeekConfig {
    fn from(week: &TradingWeek) -> Self {
        TradingWeekConfig::new(week.weekend_days.iter().copied())
    }
}

/// A calendar month, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date - Duration::days(i64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// First day of the following month, rolling December into January.
    pub fn next(&self) -> Option<Self> {
        if self.month() == 12 {
            Self::new(self.year() + 1, 1)
        } else {
            Self::new(self.year(), self.month() + 1)
        }
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .and_then(|next| next.first_day().pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.format("%Y-%m").to_string())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%B %Y"))
    }
}

/// Inclusive range of whole months. Empty when `start` is after `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl MonthRange {
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        Self { start, end }
    }

    /// Months covering `from` through `to`.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self::new(YearMonth::of(from), YearMonth::of(to))
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn months(&self) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut current = Some(self.start);
        while let Some(month) = current {
            if month > self.end {
                break;
            }
            months.push(month);
            current = month.next();
        }
        months
    }
}
