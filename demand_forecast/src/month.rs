//! Calendar month arithmetic

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month identified by (year, month).
///
/// Field order makes the derived ordering chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, rejecting month numbers outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidMonth(format!(
                "month number {} is outside 1..=12",
                month
            )));
        }

        Ok(Self { year, month })
    }

    /// Truncate a timestamp to its calendar month
    pub fn from_datetime(ts: &NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// Calendar month, 1 = January
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The previous calendar month
    pub fn pred(&self) -> Self {
        self.shift(-1)
    }

    /// The next calendar month
    pub fn succ(&self) -> Self {
        self.shift(1)
    }

    /// Shift by `months` calendar months, wrapping across year boundaries
    pub fn shift(&self, months: i32) -> Self {
        let index = self.ordinal() + months as i64;
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Number of whole months from `other` to `self`
    pub fn months_since(&self, other: &MonthKey) -> i64 {
        self.ordinal() - other.ordinal()
    }

    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
