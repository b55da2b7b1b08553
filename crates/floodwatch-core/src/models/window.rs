//! Calendar date windows for imagery queries.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A pair of calendar dates covering `[start T00:00:00Z, end T23:59:59Z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Build a window from two dates, swapping them if given out of order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// A window covering exactly one calendar day.
    pub fn single_day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// The symmetric window `[center - days, center + days]`.
    pub fn around(center: NaiveDate, days: u64) -> Self {
        Self {
            start: center.checked_sub_days(Days::new(days)).unwrap_or(center),
            end: center.checked_add_days(Days::new(days)).unwrap_or(center),
        }
    }

    /// The `[center - days, center]` half of a symmetric window.
    pub fn before(center: NaiveDate, days: u64) -> Self {
        Self {
            start: center.checked_sub_days(Days::new(days)).unwrap_or(center),
            end: center,
        }
    }

    /// The `[center, center + days]` half of a symmetric window.
    pub fn after(center: NaiveDate, days: u64) -> Self {
        Self {
            start: center,
            end: center.checked_add_days(Days::new(days)).unwrap_or(center),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// ISO8601 interval string the catalog search expects.
    pub fn to_interval(&self) -> String {
        format!("{}T00:00:00Z/{}T23:59:59Z", self.start, self.end)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}
