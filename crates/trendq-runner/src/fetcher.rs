//! Throttled, retry-wrapped execution of single work items.

use std::sync::Arc;

use trendq_client::{is_retriable, retry_with_backoff, FetchError, Pacer, SessionProvider};
use trendq_core::{TimeSeries, WorkItem};

/// Terminal result of one work item's attempt sequence.
pub(crate) enum ItemOutcome {
    Fetched(TimeSeries),
    AbandonedTransient(FetchError),
    AbandonedPermanent(FetchError),
    SessionInvalid { reason: String },
}

/// Executes work items sequentially against the session collaborator,
/// retrying transients with backoff and pacing between items.
pub struct ThrottledFetcher {
    provider: Arc<dyn SessionProvider>,
    pacer: Pacer,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ThrottledFetcher {
    #[must_use]
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        pacer: Pacer,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            provider,
            pacer,
            max_retries,
            backoff_base_ms,
        }
    }

    /// Runs one item to a terminal outcome. Never panics the run: every
    /// error is classified; only a session rejection propagates upward.
    pub(crate) async fn fetch_item(&self, item: &WorkItem) -> ItemOutcome {
        let term = item.keyword.query_term();
        tracing::info!(
            key = %item.key,
            term,
            display = item.keyword.display_name(),
            range = %item.range,
            "fetching"
        );

        let result = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.provider.fetch(term, &item.range, item.category.as_ref())
        })
        .await;

        match result {
            Ok(series) => ItemOutcome::Fetched(series),
            Err(FetchError::SessionInvalid { reason }) => ItemOutcome::SessionInvalid { reason },
            Err(err) if is_retriable(&err) => ItemOutcome::AbandonedTransient(err),
            Err(err) => ItemOutcome::AbandonedPermanent(err),
        }
    }

    /// Pacing wait between consecutive items.
    pub(crate) async fn pause(&self) {
        self.pacer.pause().await;
    }
}
