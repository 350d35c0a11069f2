//! Calendar-day helpers used by ranged aggregation.
//!
//! Transactions are stored as UTC instants; reporting works on calendar days
//! in a single fixed offset so that range filters and the daily series agree on
//! which day an instant belongs to.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Maps instants to calendar days in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCalendar {
    offset: FixedOffset,
}

impl DayCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Returns `None` when the offset is outside +/- 24 hours.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }
}

impl Default for DayCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

/// Inclusive day range; a missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start.map_or(true, |start| day >= start) && self.end.map_or(true, |end| day <= end)
    }

    /// Every day from start to end inclusive. Empty when a bound is missing
    /// or the range is inverted.
    pub fn days(&self) -> Vec<NaiveDate> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => start
                .iter_days()
                .take_while(|day| *day <= end)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// `today - days` through `today`.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self::between(today - Duration::days(days), today)
    }

    pub fn month_to_date(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        Self::between(start, today)
    }

    pub fn year_to_date(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        Self::between(start, today)
    }
}

/// Quick range choices offered on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
    #[default]
    LastWeek,
    ThisMonth,
    ThisYear,
}

impl RangePreset {
    pub fn range(self, today: NaiveDate) -> DateRange {
        match self {
            RangePreset::LastWeek => DateRange::last_days(today, 7),
            RangePreset::ThisMonth => DateRange::month_to_date(today),
            RangePreset::ThisYear => DateRange::year_to_date(today),
        }
    }
}
