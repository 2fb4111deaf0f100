//! The session collaborator seam.

use async_trait::async_trait;

use trendq_core::{CategoryId, DateRange, TimeSeries};

use crate::error::FetchError;

/// An authenticated handle to the interest portal.
///
/// Implemented by [`crate::TrendsClient`] in production and by scripted
/// doubles in tests. Authentication happens before the handle is handed to
/// the run; implementations surface a rejected session as
/// [`FetchError::SessionInvalid`].
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Fetches the interest-over-time series for one query term over one
    /// date sub-range, optionally restricted to a category.
    ///
    /// # Errors
    ///
    /// - [`FetchError::SessionInvalid`] — session expired or rejected.
    /// - [`FetchError::RateLimited`] — quota or burst defense triggered.
    /// - [`FetchError::Http`] — network-level failure.
    /// - [`FetchError::InvalidQuery`] — the portal rejected the query.
    /// - [`FetchError::Format`] — the response shape was unexpected.
    async fn fetch(
        &self,
        term: &str,
        range: &DateRange,
        category: Option<&CategoryId>,
    ) -> Result<TimeSeries, FetchError>;
}
