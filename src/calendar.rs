//! Calendar arithmetic for billing cycles.
//!
//! Two month-overflow policies live here and nowhere else:
//! - day-of-month configuration (closing day, due day) is *clamped* to the
//!   last day of short months, see [`clamp_day`];
//! - installment dates *roll over* into the following month when the start
//!   day does not exist, see [`add_months_rollover`].

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::BillingError;

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// number of days in `month` (1-12) of `year`
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// day of month clamped into `1..=days_in_month`
pub fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    day.clamp(1, days_in_month(year, month))
}

/// add calendar months, letting a missing day spill into the next month
///
/// Jan 31 + 1 month is Mar 2 in 2024 and Mar 3 in 2025.
pub fn add_months_rollover(date: NaiveDate, months: u32) -> NaiveDate {
    let target = MonthKey::of(date).plus(months);
    let excess = u64::from(date.day() - 1);
    target
        .first_day()
        .checked_add_days(Days::new(excess))
        .unwrap_or(NaiveDate::MAX)
}

/// a statement month, `YYYY-MM`
///
/// Parsed and validated keys cover years 0000-9999. [`MonthKey::of`] keeps
/// whatever year the date carries, so keys derived from dates outside that
/// range display with more digits or a sign and do not parse back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, BillingError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(BillingError::InvalidMonthKey {
                input: format!("{:04}-{:02}", year, month),
            });
        }
        Ok(Self { year, month })
    }

    /// month containing `date`; see the type docs for years past 9999
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// month `n` months later
    pub fn plus(&self, n: u32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + n as i32;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn next(&self) -> Self {
        self.plus(1)
    }

    pub fn previous(&self) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) - 1;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// the given day of this month, clamped to the month's last day
    pub fn day(&self, day: u32) -> NaiveDate {
        let day = clamp_day(self.year, self.month, day);
        // year, month and clamped day always form a valid date
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or(NaiveDate::MIN)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.day(1)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.day(31)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BillingError::InvalidMonthKey { input: s.to_string() };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
