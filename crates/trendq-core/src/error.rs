use thiserror::Error;

use crate::dates::MonthDate;

/// Configuration and planning errors.
///
/// Everything here fails fast, before any remote call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: MonthDate, end: MonthDate },

    #[error("start date {start} is in the future (now: {now})")]
    FutureStart { start: MonthDate, now: MonthDate },

    #[error("no complete period between {since} and {now}; nothing to query")]
    NoCompletePeriod { since: MonthDate, now: MonthDate },

    #[error("keyword set is empty; supply at least one non-blank keyword")]
    EmptyKeywordSet,

    #[error("invalid date \"{input}\": {reason} (expected YYYY-MM)")]
    InvalidDate { input: String, reason: String },

    #[error("invalid alias on line {line_no}: \"{line}\" (expected display|canonical)")]
    InvalidAliasLine { line_no: usize, line: String },

    #[error("invalid throttle \"{input}\" (expected none, random, or a whole number of seconds)")]
    InvalidThrottle { input: String },

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
