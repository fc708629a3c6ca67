//! Time utility functions

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Months, NaiveDate, Utc};

/// Source of "today" and of waiting, so date math and retry pacing can be driven in tests
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current calendar date in UTC
    fn today(&self) -> NaiveDate;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by chrono and the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Last calendar day of the given month, or `None` for an invalid year/month
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Clock with a fixed date that records requested sleeps instead of waiting
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct ManualClock {
    today: NaiveDate,
    sleeps: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new(today: NaiveDate) -> Self {
        Self {
            today,
            sleeps: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}
