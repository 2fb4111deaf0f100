//! Interest-over-time series returned by the portal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One sampled point: a date and its relative interest value (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: u32,
}

/// An ordered sequence of interest samples for a single query.
///
/// An empty series is a valid result: the portal reports some queries as
/// having no measurable interest, and persisting the empty marker is what
/// stops a re-run from fetching them again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries(Vec<TimePoint>);

impl TimeSeries {
    #[must_use]
    pub fn new(points: Vec<TimePoint>) -> Self {
        Self(points)
    }

    #[must_use]
    pub fn points(&self) -> &[TimePoint] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<TimePoint>> for TimeSeries {
    fn from(points: Vec<TimePoint>) -> Self {
        Self(points)
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a TimePoint;
    type IntoIter = std::slice::Iter<'a, TimePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
