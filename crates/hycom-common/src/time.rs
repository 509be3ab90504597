//! Date ranges and the integer date tokens used to match dataset addresses.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{HycomError, HycomResult};

/// Inclusive calendar date range for a download request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    from_date: NaiveDate,
    to_date: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `from_date > to_date`.
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> HycomResult<Self> {
        if from_date > to_date {
            return Err(HycomError::InvalidDateRange(format!(
                "from_date {} is after to_date {}",
                from_date, to_date
            )));
        }
        Ok(Self { from_date, to_date })
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to_date
    }

    /// Calendar years touched by the range, ascending.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.from_date.year()..=self.to_date.year()
    }

    /// Every day in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from_date
            .iter_days()
            .take_while(move |day| *day <= self.to_date)
    }

    /// Daily tokens for the range, in date order.
    pub fn tokens(&self) -> Vec<DateToken> {
        self.days().map(DateToken::from).collect()
    }

    /// Number of days in the range.
    pub fn len_days(&self) -> usize {
        (self.to_date - self.from_date).num_days() as usize + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.from_date, self.to_date)
    }
}

/// A `YYYYMMDD` integer (`10000*year + 100*month + day`).
///
/// Matched as a substring of dataset address text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateToken(u32);

impl DateToken {
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Whether the token's decimal text occurs anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        text.contains(&self.to_string())
    }
}

impl From<NaiveDate> for DateToken {
    fn from(date: NaiveDate) -> Self {
        let value = 10000 * date.year() as u32 + 100 * date.month() + date.day();
        DateToken(value)
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
