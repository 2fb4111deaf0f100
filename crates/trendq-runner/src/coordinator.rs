//! End-to-end run driver: expand → plan → filter → fetch, streaming each
//! result to the output store as it arrives.

use std::sync::Arc;

use trendq_core::{expand, plan, CategoryId, Keyword, MonthDate, RangeMode, WorkItem};
use trendq_store::OutputStore;

use crate::cancel::CancelFlag;
use crate::error::RunError;
use crate::fetcher::{ItemOutcome, ThrottledFetcher};
use crate::filter::retain_missing;
use crate::summary::{AbandonKind, RunSummary};

/// Everything one invocation needs; built from CLI inputs.
///
/// `now` is injected rather than read from the clock so rolling-mode
/// expansion is reproducible in tests.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub keywords: Vec<Keyword>,
    pub mode: RangeMode,
    pub categories: Vec<CategoryId>,
    pub now: MonthDate,
}

/// Drives the pipeline for one invocation.
///
/// Strictly sequential: one fetch in flight at a time, results delivered to
/// the store in plan order, the summary mutated only here.
pub struct RunCoordinator {
    fetcher: ThrottledFetcher,
    store: Arc<dyn OutputStore>,
}

impl RunCoordinator {
    #[must_use]
    pub fn new(fetcher: ThrottledFetcher, store: Arc<dyn OutputStore>) -> Self {
        Self { fetcher, store }
    }

    /// Expands, plans, and filters without fetching anything.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Config`] for an empty keyword set or an invalid
    /// range request.
    pub async fn plan_only(&self, request: &RunRequest) -> Result<Vec<WorkItem>, RunError> {
        let items = self.build_plan(request)?;
        let (remaining, skipped) = retain_missing(self.store.as_ref(), items).await;
        tracing::info!(
            remaining = remaining.len(),
            skipped,
            "plan built (dry inspection)"
        );
        Ok(remaining)
    }

    /// Runs the full pipeline, returning the outcome summary.
    ///
    /// The summary is returned even when individual items were abandoned.
    /// Cancellation (checked between items) returns the summary accumulated
    /// so far with the remainder counted not attempted.
    ///
    /// # Errors
    ///
    /// - [`RunError::Config`] — invalid request; no remote call was made.
    /// - [`RunError::SessionInvalid`] — the portal rejected the session; the
    ///   error carries the partial summary.
    pub async fn run(
        &self,
        request: &RunRequest,
        cancel: &CancelFlag,
    ) -> Result<RunSummary, RunError> {
        let items = self.build_plan(request)?;
        let planned = items.len();

        let (remaining, skipped) = retain_missing(self.store.as_ref(), items).await;
        let mut summary = RunSummary {
            skipped,
            ..RunSummary::default()
        };

        let total = remaining.len();
        tracing::info!(planned, skipped, to_fetch = total, "starting run");

        for (idx, item) in remaining.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.not_attempted = total - idx;
                tracing::warn!(
                    completed = idx,
                    not_attempted = summary.not_attempted,
                    "run cancelled at item boundary"
                );
                break;
            }

            match self.fetcher.fetch_item(item).await {
                ItemOutcome::Fetched(series) => {
                    match self
                        .store
                        .write(&item.key, item.keyword.display_name(), &series)
                        .await
                    {
                        Ok(()) => {
                            summary.fetched += 1;
                            tracing::debug!(key = %item.key, points = series.len(), "fetched");
                        }
                        Err(err) => {
                            tracing::warn!(key = %item.key, error = %err, "storage failure — item abandoned");
                            summary.record_abandoned(
                                item.key.clone(),
                                AbandonKind::Storage,
                                err.to_string(),
                            );
                        }
                    }
                }
                ItemOutcome::AbandonedTransient(err) => {
                    tracing::warn!(key = %item.key, error = %err, "retries exhausted — item abandoned");
                    summary.record_abandoned(
                        item.key.clone(),
                        AbandonKind::Transient,
                        err.to_string(),
                    );
                }
                ItemOutcome::AbandonedPermanent(err) => {
                    tracing::warn!(key = %item.key, error = %err, "query rejected — item abandoned");
                    summary.record_abandoned(
                        item.key.clone(),
                        AbandonKind::Permanent,
                        err.to_string(),
                    );
                }
                ItemOutcome::SessionInvalid { reason } => {
                    summary.not_attempted = total - idx - 1;
                    tracing::error!(
                        key = %item.key,
                        reason,
                        not_attempted = summary.not_attempted,
                        "session rejected — aborting remaining plan"
                    );
                    return Err(RunError::SessionInvalid {
                        key: item.key.clone(),
                        reason,
                        summary,
                    });
                }
            }

            if idx + 1 < total {
                self.fetcher.pause().await;
            }
        }

        tracing::info!(
            fetched = summary.fetched,
            skipped = summary.skipped,
            abandoned = summary.abandoned.len(),
            not_attempted = summary.not_attempted,
            "run finished"
        );
        Ok(summary)
    }

    /// Validates the request and builds the deduplicated ordered plan.
    fn build_plan(&self, request: &RunRequest) -> Result<Vec<WorkItem>, RunError> {
        if request.keywords.is_empty() {
            return Err(trendq_core::ConfigError::EmptyKeywordSet.into());
        }
        let ranges = expand(&request.mode, request.now)?;
        Ok(plan(&request.keywords, &ranges, &request.categories))
    }
}
