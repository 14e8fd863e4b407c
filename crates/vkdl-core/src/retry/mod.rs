//! Retry and backoff policy.
//!
//! This module encapsulates error classification (timeouts, throttling,
//! connection failures vs. not-found/auth) and backoff decisions so the
//! scheduler and media source clients share one consistent policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_http_status, error_from_message};
pub use error::SourceError;
pub use policy::{Backoff, ErrorKind, ExponentialBackoff, FixedDelay, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
