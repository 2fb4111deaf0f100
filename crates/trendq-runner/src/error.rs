use thiserror::Error;

use trendq_core::{ConfigError, OutputKey};

use crate::summary::RunSummary;

/// Errors that end a run without a normal summary return.
///
/// Everything else — transient exhaustion, permanent rejections, storage
/// failures — is absorbed into the [`RunSummary`] and the run continues.
#[derive(Debug, Error)]
pub enum RunError {
    /// Invalid configuration; nothing was attempted.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The portal rejected our session mid-run. The remaining plan was
    /// aborted; `summary` still accounts for everything before the abort and
    /// counts the remainder as not attempted.
    #[error("session rejected while fetching {key}: {reason}")]
    SessionInvalid {
        key: OutputKey,
        reason: String,
        summary: RunSummary,
    },
}
