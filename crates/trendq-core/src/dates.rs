//! Month-granularity dates and date-range expansion.
//!
//! A batch run queries one remote report per sub-range. Sub-ranges are either
//! a single explicit window or a rolling sequence of calendar quarters or
//! years, always uniform in length so interest values stay comparable across
//! keywords.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A point in time at year-month granularity.
///
/// Displayed and parsed as `YYYY-MM`. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDate {
    pub year: i32,
    pub month: u32,
}

impl MonthDate {
    /// Builds a `MonthDate`, returning `None` when `month` is outside `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The current UTC year-month.
    #[must_use]
    pub fn current() -> Self {
        use chrono::Datelike;
        let today = chrono::Utc::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Months elapsed since 0000-01. Total order used for all range math.
    #[allow(clippy::cast_possible_wrap)]
    fn index(self) -> i32 {
        self.year * 12 + (self.month as i32 - 1)
    }

    #[allow(clippy::cast_sign_loss)]
    fn from_index(index: i32) -> Self {
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn plus_months(self, months: u32) -> Self {
        Self::from_index(self.index() + months as i32)
    }

    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn minus_months(self, months: u32) -> Self {
        Self::from_index(self.index() - months as i32)
    }

    /// First month of the calendar quarter containing `self`.
    #[must_use]
    pub fn quarter_start(self) -> Self {
        Self {
            year: self.year,
            month: (self.month - 1) / 3 * 3 + 1,
        }
    }

    /// January of the same year.
    #[must_use]
    pub fn year_start(self) -> Self {
        Self {
            year: self.year,
            month: 1,
        }
    }
}

impl fmt::Display for MonthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthDate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidDate {
            input: s.to_owned(),
            reason: reason.to_owned(),
        };
        let (year_str, month_str) = s.split_once('-').ok_or_else(|| invalid("missing '-'"))?;
        let year: i32 = year_str
            .parse()
            .map_err(|_| invalid("year is not a number"))?;
        let month: u32 = month_str
            .parse()
            .map_err(|_| invalid("month is not a number"))?;
        Self::new(year, month).ok_or_else(|| invalid("month must be between 01 and 12"))
    }
}

/// An inclusive month span. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: MonthDate,
    pub end: MonthDate,
}

impl DateRange {
    /// Number of months covered, inclusive of both endpoints.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn months(&self) -> u32 {
        (self.end.index() - self.start.index() + 1) as u32
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.start, self.end)
    }
}

/// How the requested span is split into per-query sub-ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeMode {
    /// A single window, queried as-is.
    Explicit { start: MonthDate, end: MonthDate },
    /// One 3-month range per calendar quarter, from the quarter containing
    /// `since` through the latest complete quarter.
    Quarterly { since: MonthDate },
    /// One 12-month range per calendar year, from the year containing
    /// `since` through the latest complete year.
    Yearly { since: MonthDate },
}

/// Expands `mode` into an ordered sequence of non-overlapping sub-ranges.
///
/// Rolling modes snap a mid-period `since` back to its period boundary so
/// every sub-range has uniform length, and stop at the last period whose
/// final month is not after `now`.
///
/// # Errors
///
/// - [`ConfigError::InvalidRange`] when an explicit start is after its end.
/// - [`ConfigError::FutureStart`] when the start is after `now`.
/// - [`ConfigError::NoCompletePeriod`] when no quarter/year has completed
///   since `since`.
pub fn expand(mode: &RangeMode, now: MonthDate) -> Result<Vec<DateRange>, ConfigError> {
    match *mode {
        RangeMode::Explicit { start, end } => {
            if start > end {
                return Err(ConfigError::InvalidRange { start, end });
            }
            if start > now {
                return Err(ConfigError::FutureStart { start, now });
            }
            Ok(vec![DateRange { start, end }])
        }
        RangeMode::Quarterly { since } => rolling(since, since.quarter_start(), 3, now),
        RangeMode::Yearly { since } => rolling(since, since.year_start(), 12, now),
    }
}

fn rolling(
    since: MonthDate,
    first: MonthDate,
    period_months: u32,
    now: MonthDate,
) -> Result<Vec<DateRange>, ConfigError> {
    if since > now {
        return Err(ConfigError::FutureStart { start: since, now });
    }

    let mut ranges = Vec::new();
    let mut start = first;
    loop {
        let end = start.plus_months(period_months - 1);
        if end > now {
            break;
        }
        ranges.push(DateRange { start, end });
        start = start.plus_months(period_months);
    }

    if ranges.is_empty() {
        return Err(ConfigError::NoCompletePeriod { since, now });
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> MonthDate {
        MonthDate::new(year, month).unwrap()
    }

    #[test]
    fn month_date_parses_and_displays() {
        let d: MonthDate = "2004-01".parse().unwrap();
        assert_eq!(d, ym(2004, 1));
        assert_eq!(d.to_string(), "2004-01");
    }

    #[test]
    fn month_date_rejects_bad_input() {
        assert!("2004".parse::<MonthDate>().is_err());
        assert!("2004-13".parse::<MonthDate>().is_err());
        assert!("04-xx".parse::<MonthDate>().is_err());
    }

    #[test]
    fn month_arithmetic_crosses_year_boundaries() {
        assert_eq!(ym(2004, 11).plus_months(3), ym(2005, 2));
        assert_eq!(ym(2004, 1).minus_months(2), ym(2003, 11));
    }

    #[test]
    fn explicit_mode_yields_single_range() {
        let mode = RangeMode::Explicit {
            start: ym(2010, 3),
            end: ym(2010, 9),
        };
        let ranges = expand(&mode, ym(2013, 12)).unwrap();
        assert_eq!(
            ranges,
            vec![DateRange {
                start: ym(2010, 3),
                end: ym(2010, 9),
            }]
        );
    }

    #[test]
    fn explicit_mode_rejects_inverted_range() {
        let mode = RangeMode::Explicit {
            start: ym(2011, 6),
            end: ym(2010, 1),
        };
        let err = expand(&mode, ym(2013, 12)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { .. }), "{err}");
    }

    #[test]
    fn explicit_mode_rejects_future_start() {
        let mode = RangeMode::Explicit {
            start: ym(2014, 1),
            end: ym(2014, 6),
        };
        let err = expand(&mode, ym(2013, 12)).unwrap_err();
        assert!(matches!(err, ConfigError::FutureStart { .. }), "{err}");
    }

    #[test]
    fn quarterly_from_2004_through_2013_yields_forty_quarters() {
        let mode = RangeMode::Quarterly { since: ym(2004, 1) };
        let ranges = expand(&mode, ym(2013, 12)).unwrap();
        assert_eq!(ranges.len(), 40);
        assert_eq!(ranges[0].start, ym(2004, 1));
        assert_eq!(ranges[0].end, ym(2004, 3));
        assert_eq!(ranges[39].start, ym(2013, 10));
        assert_eq!(ranges[39].end, ym(2013, 12));

        // Chronological, contiguous, non-overlapping, uniform length.
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end.plus_months(1), pair[1].start);
        }
        assert!(ranges.iter().all(|r| r.months() == 3));
    }

    #[test]
    fn quarterly_mid_quarter_start_snaps_to_quarter_boundary() {
        let mode = RangeMode::Quarterly { since: ym(2012, 5) };
        let ranges = expand(&mode, ym(2012, 12)).unwrap();
        assert_eq!(ranges[0].start, ym(2012, 4));
        assert_eq!(ranges.len(), 3);
    }

    #[test]
    fn quarterly_excludes_incomplete_trailing_quarter() {
        let mode = RangeMode::Quarterly { since: ym(2013, 1) };
        // November: Q4 has not finished yet.
        let ranges = expand(&mode, ym(2013, 11)).unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[2].end, ym(2013, 9));
    }

    #[test]
    fn quarterly_rejects_future_since() {
        let mode = RangeMode::Quarterly { since: ym(2014, 2) };
        let err = expand(&mode, ym(2013, 12)).unwrap_err();
        assert!(matches!(err, ConfigError::FutureStart { .. }), "{err}");
    }

    #[test]
    fn yearly_produces_calendar_years() {
        let mode = RangeMode::Yearly { since: ym(2007, 6) };
        let ranges = expand(&mode, ym(2010, 12)).unwrap();
        assert_eq!(ranges.len(), 4);
        assert_eq!(ranges[0].start, ym(2007, 1));
        assert_eq!(ranges[0].end, ym(2007, 12));
        assert_eq!(ranges[3].end, ym(2010, 12));
        assert!(ranges.iter().all(|r| r.months() == 12));
    }

    #[test]
    fn yearly_with_no_complete_year_is_an_error() {
        let mode = RangeMode::Yearly { since: ym(2013, 2) };
        let err = expand(&mode, ym(2013, 11)).unwrap_err();
        assert!(matches!(err, ConfigError::NoCompletePeriod { .. }), "{err}");
    }
}
