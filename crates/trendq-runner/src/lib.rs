//! Batch run orchestration: completion filtering, throttled sequential
//! fetching, and the coordinator that drives expand → plan → filter → fetch
//! while streaming results to the output store.

pub mod cancel;
pub mod coordinator;
pub mod error;
mod fetcher;
mod filter;
pub mod summary;

pub use cancel::CancelFlag;
pub use coordinator::{RunCoordinator, RunRequest};
pub use error::RunError;
pub use fetcher::ThrottledFetcher;
pub use summary::{AbandonKind, AbandonedItem, RunSummary};
