use thiserror::Error;

/// Errors surfaced by a portal fetch.
///
/// The variant determines how the run reacts: transient errors
/// ([`FetchError::RateLimited`], network-level [`FetchError::Http`]) are
/// retried with backoff, permanent errors abandon the item, and
/// [`FetchError::SessionInvalid`] aborts the remaining plan — every later
/// item would fail the same way.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The portal rejected our session (expired cookie, forced re-login).
    #[error("session rejected by portal: {reason}")]
    SessionInvalid { reason: String },

    /// Quota or burst defense triggered (HTTP 429 or a quota interstitial).
    #[error("rate limited by portal (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The portal reports the query itself is invalid (unknown category,
    /// malformed date window). Retrying cannot fix it.
    #[error("portal rejected the query: {reason}")]
    InvalidQuery { reason: String },

    /// The response did not match the expected report shape.
    #[error("unexpected report format for {context}: {reason}")]
    Format { context: String, reason: String },
}
