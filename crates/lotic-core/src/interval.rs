//! Temporal lot bucketing: truncating timestamps to fixed-width intervals and
//! rendering them as canonical lot ids.
//!
//! A day is broken into a fixed number of equal intervals. Fourths is a
//! 15-minute duration (96 per day), Sixths a 10-minute duration (144 per day),
//! and Twelfths a 5-minute duration (288 per day).
//!
//! The canonical lot id is `YYYYMMDD` + the ISO-8601 duration literal of the
//! unit + the zero-padded 3-digit index of the interval within the UTC day:
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use lotic_core::interval::{IntervalBuilder, IntervalUnit};
//!
//! let builder = IntervalBuilder::new(IntervalUnit::Fourths);
//! let t = Utc.with_ymd_and_hms(2023, 2, 6, 23, 52, 6).unwrap();
//! assert_eq!(builder.truncate_and_format(t), "20230206PT15M095");
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use crate::error::{Error, Result};

/// A fixed-width interval unit that evenly divides the UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    /// 15-minute intervals, 96 per day.
    Fourths,
    /// 10-minute intervals, 144 per day.
    Sixths,
    /// 5-minute intervals, 288 per day.
    Twelfths,
}

impl IntervalUnit {
    /// Returns the interval width in minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        match self {
            Self::Fourths => 15,
            Self::Sixths => 10,
            Self::Twelfths => 5,
        }
    }

    /// Returns the number of intervals in one UTC day.
    #[must_use]
    pub const fn intervals_per_day(&self) -> u32 {
        24 * 60 / self.minutes()
    }

    /// Returns the ISO-8601 duration literal embedded in lot ids.
    #[must_use]
    pub const fn iso_literal(&self) -> &'static str {
        match self {
            Self::Fourths => "PT15M",
            Self::Sixths => "PT10M",
            Self::Twelfths => "PT5M",
        }
    }

    /// Returns the unit name used in declarative configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fourths => "fourths",
            Self::Sixths => "sixths",
            Self::Twelfths => "twelfths",
        }
    }

    /// Finds the unit with the given configured name.
    ///
    /// Accepts case-insensitive names with an optional `-of-day` suffix, e.g.
    /// `"fourths"`, `"Fourths"`, or `"fourths-of-day"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the name matches no supported unit.
    pub fn parse(name: &str) -> Result<Self> {
        let normalized = name.to_ascii_lowercase();
        let normalized = normalized.strip_suffix("-of-day").unwrap_or(&normalized);

        match normalized {
            "fourths" => Ok(Self::Fourths),
            "sixths" => Ok(Self::Sixths),
            "twelfths" => Ok(Self::Twelfths),
            _ => Err(Error::Format(format!("unsupported interval unit: {name}"))),
        }
    }
}

impl std::fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Truncates, formats, and parses timestamps against one interval unit.
///
/// Contracts, for all timestamps `t`:
/// - `format(truncate(t)) == format(t)`
/// - `parse(format(t)) == truncate(t)`
#[derive(Debug, Clone, Copy)]
pub struct IntervalBuilder {
    unit: IntervalUnit,
}

impl IntervalBuilder {
    /// Creates a builder for the given unit.
    #[must_use]
    pub const fn new(unit: IntervalUnit) -> Self {
        Self { unit }
    }

    /// Returns the unit this builder buckets with.
    #[must_use]
    pub const fn unit(&self) -> IntervalUnit {
        self.unit
    }

    /// Floors the timestamp to the start of its containing interval, in UTC.
    #[must_use]
    pub fn truncate(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let width = self.unit.minutes();
        let minute_of_day = timestamp.hour() * 60 + timestamp.minute();
        let floored = minute_of_day - minute_of_day % width;

        at_minute_of_day(timestamp.date_naive(), floored)
    }

    /// Renders the canonical lot id for the interval containing `timestamp`.
    #[must_use]
    pub fn format(&self, timestamp: DateTime<Utc>) -> String {
        let minute_of_day = timestamp.hour() * 60 + timestamp.minute();
        let index = minute_of_day / self.unit.minutes();

        format!(
            "{:04}{:02}{:02}{}{:03}",
            timestamp.year(),
            timestamp.month(),
            timestamp.day(),
            self.unit.iso_literal(),
            index
        )
    }

    /// Truncates and formats in one step.
    #[must_use]
    pub fn truncate_and_format(&self, timestamp: DateTime<Utc>) -> String {
        self.format(self.truncate(timestamp))
    }

    /// Parses a canonical lot id back to the start of its interval.
    ///
    /// The inverse of [`format`](Self::format) over truncated timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] for the wrong digit counts, a unit literal
    /// mismatch, an invalid calendar date, or an out-of-range interval index.
    pub fn parse(&self, lot: &str) -> Result<DateTime<Utc>> {
        let literal = self.unit.iso_literal();
        let expected = 8 + literal.len() + 3;

        if lot.len() != expected || !lot.is_ascii() {
            return Err(Error::Format(format!(
                "lot id must be {expected} characters of the form YYYYMMDD{literal}NNN, got: {lot}"
            )));
        }

        let (date_part, rest) = lot.split_at(8);
        let (unit_part, index_part) = rest.split_at(literal.len());

        if unit_part != literal {
            return Err(Error::Format(format!(
                "lot id unit literal mismatch, expected {literal}, got: {lot}"
            )));
        }

        let year: i32 = parse_digits(&date_part[0..4], lot)?;
        let month: u32 = parse_digits(&date_part[4..6], lot)?;
        let day: u32 = parse_digits(&date_part[6..8], lot)?;
        let index: u32 = parse_digits(index_part, lot)?;

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| Error::Format(format!("invalid calendar date in lot id: {lot}")))?;

        if index >= self.unit.intervals_per_day() {
            return Err(Error::Format(format!(
                "interval index {index} out of range [0, {}) in lot id: {lot}",
                self.unit.intervals_per_day()
            )));
        }

        Ok(at_minute_of_day(date, index * self.unit.minutes()))
    }

    /// Returns the timestamp one interval earlier.
    #[must_use]
    pub fn previous(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        timestamp - Duration::minutes(i64::from(self.unit.minutes()))
    }
}

fn at_minute_of_day(date: NaiveDate, minute_of_day: u32) -> DateTime<Utc> {
    // minute_of_day is always < 1440 here, so the construction cannot fail.
    let time =
        NaiveTime::from_num_seconds_from_midnight_opt(minute_of_day * 60, 0).unwrap_or(NaiveTime::MIN);

    Utc.from_utc_datetime(&date.and_time(time))
}

fn parse_digits<T: std::str::FromStr>(digits: &str, lot: &str) -> Result<T> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Format(format!("non-digit characters in lot id: {lot}")));
    }

    digits
        .parse()
        .map_err(|_| Error::Format(format!("unparsable numeric field in lot id: {lot}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn fourths_example() {
        let builder = IntervalBuilder::new(IntervalUnit::Fourths);
        let t = at(2023, 2, 6, 23, 52, 6) + Duration::milliseconds(500);

        assert_eq!(builder.truncate_and_format(t), "20230206PT15M095");
        assert_eq!(builder.truncate(t), at(2023, 2, 6, 23, 45, 0));
    }

    #[test]
    fn sixths_example() {
        let builder = IntervalBuilder::new(IntervalUnit::Sixths);
        let t = at(2023, 2, 6, 23, 52, 6) + Duration::milliseconds(500);

        assert_eq!(builder.truncate_and_format(t), "20230206PT10M143");
        assert_eq!(builder.truncate(t), at(2023, 2, 6, 23, 50, 0));
    }

    #[test]
    fn twelfths_midnight() {
        let builder = IntervalBuilder::new(IntervalUnit::Twelfths);
        assert_eq!(
            builder.truncate_and_format(at(2021, 11, 12, 0, 0, 0)),
            "20211112PT5M000"
        );
    }

    #[test]
    fn truncation_is_idempotent_for_format() {
        for unit in [
            IntervalUnit::Fourths,
            IntervalUnit::Sixths,
            IntervalUnit::Twelfths,
        ] {
            let builder = IntervalBuilder::new(unit);
            let t = at(2023, 6, 30, 13, 37, 59);
            assert_eq!(builder.format(builder.truncate(t)), builder.format(t));
        }
    }

    #[test]
    fn parse_inverts_format() {
        for unit in [
            IntervalUnit::Fourths,
            IntervalUnit::Sixths,
            IntervalUnit::Twelfths,
        ] {
            let builder = IntervalBuilder::new(unit);
            let t = at(2023, 2, 6, 23, 52, 6);
            let truncated = builder.truncate(t);

            assert_eq!(builder.parse(&builder.format(t)).unwrap(), truncated);
        }
    }

    #[test]
    fn all_indices_round_trip() {
        let builder = IntervalBuilder::new(IntervalUnit::Fourths);

        for index in 0..IntervalUnit::Fourths.intervals_per_day() {
            let lot = format!("20230206PT15M{index:03}");
            let parsed = builder.parse(&lot).unwrap();
            assert_eq!(builder.format(parsed), lot);
        }
    }

    #[test]
    fn parse_rejects_out_of_range_index() {
        let builder = IntervalBuilder::new(IntervalUnit::Fourths);
        assert!(matches!(
            builder.parse("20230206PT15M096"),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            builder.parse("20230206PT15M999"),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        let builder = IntervalBuilder::new(IntervalUnit::Fourths);

        // wrong digit counts
        assert!(builder.parse("2023026PT15M095").is_err());
        assert!(builder.parse("20230206PT15M95").is_err());
        // unit literal mismatch
        assert!(builder.parse("20230206PT10M095").is_err());
        // non-digit characters
        assert!(builder.parse("20230206PT15M09a").is_err());
        // invalid calendar date
        assert!(builder.parse("20230231PT15M095").is_err());
    }

    #[test]
    fn previous_steps_back_one_unit() {
        let builder = IntervalBuilder::new(IntervalUnit::Sixths);
        let t = at(2023, 1, 1, 0, 0, 0);
        assert_eq!(builder.previous(t), at(2022, 12, 31, 23, 50, 0));
    }

    #[test]
    fn unit_parse_accepts_aliases() {
        assert_eq!(
            IntervalUnit::parse("fourths-of-day").unwrap(),
            IntervalUnit::Fourths
        );
        assert_eq!(IntervalUnit::parse("Sixths").unwrap(), IntervalUnit::Sixths);
        assert_eq!(
            IntervalUnit::parse("TWELFTHS").unwrap(),
            IntervalUnit::Twelfths
        );
        assert!(IntervalUnit::parse("eighths").is_err());
    }
}
