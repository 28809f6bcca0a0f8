//! Date range model.
//!
//! This module contains the [`DateRange`] type that bounds every wage
//! calculation. Attendance dates carry only a month and a day, so every
//! textual factory takes the payroll year explicitly.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An inclusive interval over calendar dates.
///
/// A `DateRange` can only be built through its validating constructors, so
/// `end >= start` always holds.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::month_range(2023, 2).unwrap();
/// assert_eq!(range.start(), NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
/// assert_eq!(range.end(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
/// assert_eq!(range.inclusive_day_count(), 28);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = EngineError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::from_endpoints(raw.start, raw.end)
    }
}

impl DateRange {
    /// Creates a range from two dates.
    ///
    /// Returns `InvalidRange` when `end` precedes `start`. A single-day range
    /// (`start == end`) is valid.
    pub fn from_endpoints(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering a whole calendar month of `year`.
    ///
    /// Returns `InvalidMonth` when `month` is outside 1–12.
    pub fn month_range(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidMonth {
            value: month.to_string(),
        };

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month_start = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        let end = next_month_start.pred_opt().ok_or_else(invalid)?;

        Self::from_endpoints(start, end)
    }

    /// Parses a `MM` month string and returns that month of `year`.
    pub fn parse_month(month: &str, year: i32) -> EngineResult<Self> {
        let number = month
            .trim()
            .parse::<u32>()
            .map_err(|_| EngineError::InvalidMonth {
                value: month.to_string(),
            })?;
        Self::month_range(year, number)
    }

    /// Parses two `MM/DD` strings into a range within `year`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::DateRange;
    ///
    /// let range = DateRange::parse_endpoints("06/03", "06/07", 2024).unwrap();
    /// assert_eq!(range.inclusive_day_count(), 5);
    ///
    /// assert!(DateRange::parse_endpoints("06/07", "06/03", 2024).is_err());
    /// ```
    pub fn parse_endpoints(start: &str, end: &str, year: i32) -> EngineResult<Self> {
        Self::from_endpoints(
            parse_month_day(start, year)?,
            parse_month_day(end, year)?,
        )
    }

    /// The first day of the range.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last day of the range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Checks if a date falls within this range, inclusive of both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The number of calendar days in the range, counting both endpoints.
    pub fn inclusive_day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Parses a `MM/DD` string as a date in `year`.
///
/// Parsing is strict: `02/30` and `13/01` are rejected with `InvalidDate`.
pub fn parse_month_day(value: &str, year: i32) -> EngineResult<NaiveDate> {
    let invalid = || EngineError::InvalidDate {
        value: value.to_string(),
    };

    let (month, day) = value.trim().split_once('/').ok_or_else(invalid)?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    let day = day.parse::<u32>().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Formats a date back into the `MM/DD` form.
pub fn format_month_day(date: NaiveDate) -> String {
    format!("{:02}/{:02}", date.month(), date.day())
}
