//! Output collaborator: where fetched series are persisted and where
//! completion probes look for already-finished work.
//!
//! Any backend satisfying [`OutputStore`] works — the production directory
//! store, the in-memory store used by tests, or something remote. The
//! `exists` probe against the derived output key is the entire resumability
//! mechanism: there is no separate run ledger.

pub mod dir;
pub mod error;
pub mod memory;

use async_trait::async_trait;

use trendq_core::{OutputKey, TimeSeries};

pub use dir::DirStore;
pub use error::StorageError;
pub use memory::MemoryStore;

/// A persistence backend keyed by [`OutputKey`].
#[async_trait]
pub trait OutputStore: Send + Sync {
    /// Whether a result for `key` is already persisted. Read-only probe.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be queried at all.
    async fn exists(&self, key: &OutputKey) -> Result<bool, StorageError>;

    /// Persists one series under `key`. Called at most once per key per run.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the result cannot be written.
    async fn write(
        &self,
        key: &OutputKey,
        display_name: &str,
        series: &TimeSeries,
    ) -> Result<(), StorageError>;
}

/// Renders a series as the two-column CSV layout consumed by downstream
/// analysis: a `Date,<display name>` header followed by one row per sample.
#[must_use]
pub fn render_csv(display_name: &str, series: &TimeSeries) -> String {
    let mut out = String::new();
    out.push_str("Date,");
    out.push_str(&csv_escape(display_name));
    out.push('\n');
    for point in series {
        out.push_str(&format!("{},{}\n", point.date, point.value));
    }
    out
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use trendq_core::{TimePoint, TimeSeries};

    use super::*;

    #[test]
    fn renders_header_and_rows() {
        let series = TimeSeries::new(vec![
            TimePoint {
                date: NaiveDate::from_ymd_opt(2010, 1, 3).unwrap(),
                value: 45,
            },
            TimePoint {
                date: NaiveDate::from_ymd_opt(2010, 1, 10).unwrap(),
                value: 47,
            },
        ]);
        let csv = render_csv("tesla", &series);
        assert_eq!(csv, "Date,tesla\n2010-01-03,45\n2010-01-10,47\n");
    }

    #[test]
    fn empty_series_still_renders_a_header() {
        let csv = render_csv("obscure term", &TimeSeries::default());
        assert_eq!(csv, "Date,obscure term\n");
    }

    #[test]
    fn display_names_with_commas_are_quoted() {
        let csv = render_csv("widgets, inc", &TimeSeries::default());
        assert_eq!(csv, "Date,\"widgets, inc\"\n");
    }
}
