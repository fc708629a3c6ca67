//! Date ranges and the duration tokens that produce them

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::InputError;
use super::input::{SUPPORTED_YEARS, parse_date};
use crate::utils::time::last_day_of_month;

/// Caller-supplied range length selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationToken {
    Week,
    Month,
}

impl DurationToken {
    /// Accepts exactly `week` or `month`
    pub fn parse(raw: Option<&str>) -> Result<Self, InputError> {
        match raw {
            Some("week") => Ok(Self::Week),
            Some("month") => Ok(Self::Month),
            _ => Err(InputError::InvalidDuration),
        }
    }
}

/// How `month` is resolved when anchored on an explicit start date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthPolicy {
    /// Thirty days starting at the start date
    #[default]
    Rolling,
    /// Through the last day of the start date's month
    Calendar,
}

impl fmt::Display for MonthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rolling => f.write_str("rolling"),
            Self::Calendar => f.write_str("calendar"),
        }
    }
}

/// Inclusive span of calendar dates with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Range beginning at `start` whose length is chosen by `token`
    pub fn from_start(
        start: NaiveDate,
        token: DurationToken,
        policy: MonthPolicy,
    ) -> Result<Self, InputError> {
        let end = match (token, policy) {
            (DurationToken::Week, _) => start.checked_add_days(Days::new(6)),
            (DurationToken::Month, MonthPolicy::Rolling) => start.checked_add_days(Days::new(29)),
            (DurationToken::Month, MonthPolicy::Calendar) => {
                last_day_of_month(start.year(), start.month())
            }
        };
        end.filter(|end| SUPPORTED_YEARS.contains(&end.year()))
            .and_then(|end| Self::new(start, end))
            .ok_or(InputError::InvalidDate)
    }

    /// The whole calendar month `year-month`
    pub fn calendar_month(year: i32, month: u32) -> Result<Self, InputError> {
        let start = parse_date(year, month, 1)?;
        let end = last_day_of_month(year, month).ok_or(InputError::InvalidDate)?;
        Self::new(start, end).ok_or(InputError::InvalidDate)
    }

    /// Window ending `today`, reaching back 7 (week) or 30 (month) days
    pub fn trailing(today: NaiveDate, token: DurationToken) -> Result<Self, InputError> {
        let back = match token {
            DurationToken::Week => 7,
            DurationToken::Month => 30,
        };
        today
            .checked_sub_days(Days::new(back))
            .and_then(|start| Self::new(start, today))
            .ok_or(InputError::InvalidDate)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included
    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// Every date from start to end in chronological order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}
