//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::error::SourceError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// Intermediate failures are only logged; the caller sees the final result.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, SourceError>
where
    F: FnMut(u32) -> Result<T, SourceError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, ?kind, "retrying after {:?}: {}", d, e);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
