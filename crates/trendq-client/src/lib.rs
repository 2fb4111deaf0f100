//! Portal session collaborator: the [`SessionProvider`] trait, its HTTP
//! implementation, retry/backoff, and request pacing.

pub mod client;
pub mod error;
pub mod pace;
mod parse;
pub mod retry;
pub mod session;

pub use client::TrendsClient;
pub use error::FetchError;
pub use pace::{Pacer, PacingPolicy};
pub use retry::{is_retriable, retry_with_backoff};
pub use session::SessionProvider;
