//! Calendar [`Date`] definitions.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::{format_description::BorrowedFormatItem, macros::format_description};

/// Format of a [`Date`] on the wire: `YYYY-MM-DD`.
const FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date without a time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] from its calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_calendar(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the year of this [`Date`].
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the month of this [`Date`], in `1..=12` range.
    #[must_use]
    pub fn month(self) -> u8 {
        self.0.month().into()
    }

    /// Returns the day of month of this [`Date`].
    #[must_use]
    pub fn day(self) -> u8 {
        self.0.day()
    }

    /// Adds the provided number of calendar `months` to this [`Date`].
    ///
    /// The day of month is preserved when the target month has it, otherwise
    /// it's clamped to the last day of the target month (so `2024-01-31`
    /// plus one month is `2024-02-29`).
    ///
    /// [`None`] is returned if the result is out of the supported range.
    #[must_use]
    pub fn add_months(self, months: u32) -> Option<Self> {
        let total = i64::from(self.year()) * 12
            + i64::from(self.month() - 1)
            + i64::from(months);
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = u8::try_from(total.rem_euclid(12) + 1).ok()?;
        let month = time::Month::try_from(month).ok()?;
        let day = self.day().min(time::util::days_in_year_month(year, month));
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, FORMAT).map(Self).map_err(ParseError)
    }
}

/// Error of parsing a [`Date`] from a `YYYY-MM-DD` string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `YYYY-MM-DD` date: {_0}")]
pub struct ParseError(time::error::Parse);

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats() {
        let d = date("2024-01-15");

        assert_eq!((d.year(), d.month(), d.day()), (2024, 1, 15));
        assert_eq!(d.to_string(), "2024-01-15");
        assert_eq!(Date::from_calendar(2024, 1, 15), Some(d));

        assert!("2024-13-01".parse::<Date>().is_err());
        assert!("2024-02-30".parse::<Date>().is_err());
        assert!("15/01/2024".parse::<Date>().is_err());
    }

    #[test]
    fn adds_months_preserving_day() {
        assert_eq!(date("2024-01-15").add_months(0), Some(date("2024-01-15")));
        assert_eq!(date("2024-01-15").add_months(3), Some(date("2024-04-15")));
        assert_eq!(date("2024-11-15").add_months(2), Some(date("2025-01-15")));
        assert_eq!(date("2024-01-15").add_months(24), Some(date("2026-01-15")));
    }

    #[test]
    fn clamps_to_last_day_of_month() {
        assert_eq!(date("2024-01-31").add_months(1), Some(date("2024-02-29")));
        assert_eq!(date("2023-01-31").add_months(1), Some(date("2023-02-28")));
        assert_eq!(date("2024-01-31").add_months(3), Some(date("2024-04-30")));
        assert_eq!(date("2024-01-31").add_months(2), Some(date("2024-03-31")));
    }

    #[test]
    fn serializes_as_string() {
        let d = date("2024-07-01");

        assert_eq!(serde_json::to_string(&d).unwrap(), r#""2024-07-01""#);
        assert_eq!(
            serde_json::from_str::<Date>(r#""2024-07-01""#).unwrap(),
            d,
        );
    }
}
