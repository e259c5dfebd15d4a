// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar date without a time-of-day or timezone component.
///
/// This is the canonical calendar used for every occurrence, cancellation and
/// subscription comparison. It serializes as an ISO-8601 date string
/// (`YYYY-MM-DD`); instants are never stored or compared.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Wrap a value into this type.
    pub const fn from(inner: NaiveDate) -> Self {
        Self(inner)
    }

    /// Create a calendar date from year, month and day.
    ///
    /// Returns `None` for out-of-range components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Destructure this type and extract the inner value.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// The weekday this date falls on.
    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// The day-of-month component (1-31).
    pub fn day_of_month(self) -> u32 {
        self.0.day()
    }

    /// Number of months since year 0, used to compare month positions of two
    /// dates independently of their day-of-month.
    pub fn month_index(self) -> i64 {
        i64::from(self.0.year()) * 12 + i64::from(self.0.month0())
    }

    /// This date advanced by the given number of days.
    pub fn add_days(self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(Self)
    }

    /// This date advanced by the given number of calendar months.
    ///
    /// The day-of-month is kept, clamped to the length of the target month
    /// (`2024-01-31` + 1 month = `2024-02-29`).
    pub fn add_months(self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Self)
    }

    /// Signed number of days from `other` to `self`.
    pub fn days_since(self, other: Self) -> i64 {
        self.0.signed_duration_since(other.0).num_days()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.format("%Y-%m-%d").fmt(f)
    }
}

/// Error returned when parsing a malformed calendar date string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid calendar date {0:?}, expected YYYY-MM-DD")]
pub struct InvalidCalendarDate(pub String);

impl FromStr for CalendarDate {
    type Err = InvalidCalendarDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| InvalidCalendarDate(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_display_roundtrip() {
        assert_eq!(date("2024-01-07").to_string(), "2024-01-07");
        assert_eq!(date("2024-01-07").weekday(), Weekday::Sun);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("07.01.2024".parse::<CalendarDate>().is_err());
        assert!("2024-13-01".parse::<CalendarDate>().is_err());
        assert!("2024-02-30".parse::<CalendarDate>().is_err());
    }

    #[test]
    fn serializes_as_iso_string() {
        let json = serde_json::to_string(&date("2024-01-07")).unwrap();
        assert_eq!(json, "\"2024-01-07\"");

        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date("2024-01-07"));
    }

    #[test]
    fn add_months_clamps_to_month_length() {
        assert_eq!(date("2024-01-31").add_months(1), Some(date("2024-02-29")));
        assert_eq!(date("2024-01-31").add_months(2), Some(date("2024-03-31")));
        assert_eq!(date("2023-01-31").add_months(1), Some(date("2023-02-28")));
    }

    #[test]
    fn days_since_is_signed() {
        assert_eq!(date("2024-01-14").days_since(date("2024-01-07")), 7);
        assert_eq!(date("2024-01-07").days_since(date("2024-01-14")), -7);
    }
}
