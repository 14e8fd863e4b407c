use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// High-level classification of an error for retry purposes.
///
/// Callers map client errors (HTTP status, subprocess stderr, IO failures)
/// into these kinds through [`classify`](super::classify).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (e.g. 429).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// HTTP status that is retryable but not strictly throttling (5xx).
    Http5xx(u16),
    /// Transient local I/O failure.
    Io,
    /// Definitive failure: not found, auth rejected, malformed URL. Never retried.
    Other,
}

impl ErrorKind {
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::Other)
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Wait strategy between attempts. `retry` is 1-based (1 = first retry).
pub trait Backoff: fmt::Debug + Send + Sync {
    fn delay(&self, retry: u32) -> Duration;

    /// Same schedule in yt-dlp's `--retry-sleep` expression syntax.
    fn sleep_expr(&self) -> String;
}

/// Same wait before every retry.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Backoff for FixedDelay {
    fn delay(&self, _retry: u32) -> Duration {
        self.0
    }

    fn sleep_expr(&self) -> String {
        self.0.as_secs_f64().to_string()
    }
}

/// `base * 2^(retry-1)`, capped at `max`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    pub base: Duration,
    pub max: Duration,
}

impl Backoff for ExponentialBackoff {
    fn delay(&self, retry: u32) -> Duration {
        let exp = 1u32 << retry.saturating_sub(1).min(16);
        self.base.saturating_mul(exp).min(self.max)
    }

    fn sleep_expr(&self) -> String {
        format!(
            "exp={}:{}",
            self.base.as_secs_f64(),
            self.max.as_secs_f64()
        )
    }
}

/// Retry budgets for job and fragment transfers plus the wait strategy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries (not counting the first attempt) for a whole item transfer.
    pub job_retries: u32,
    /// Retries for a single fragment within an item; handed to the client.
    pub fragment_retries: u32,
    backoff: Arc<dyn Backoff>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, 5, FixedDelay(Duration::from_secs(5)))
    }
}

impl RetryPolicy {
    pub fn new(job_retries: u32, fragment_retries: u32, backoff: impl Backoff + 'static) -> Self {
        Self {
            job_retries,
            fragment_retries,
            backoff: Arc::new(backoff),
        }
    }

    /// Swap the wait strategy, keeping the budgets.
    pub fn with_backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    /// Wait before the given 1-based retry.
    pub fn retry_delay(&self, retry: u32) -> Duration {
        self.backoff.delay(retry)
    }

    /// Wait schedule for fragment retries, in yt-dlp `--retry-sleep` syntax.
    pub fn sleep_expr(&self) -> String {
        self.backoff.sleep_expr()
    }

    /// Maximum number of attempts (including the first) for one item transfer.
    pub fn max_attempts(&self) -> u32 {
        self.job_retries.saturating_add(1)
    }

    /// Decide whether attempt `attempt` (1-based) that failed with `kind` gets another try.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts() || !kind.is_transient() {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.retry_delay(attempt))
    }
}
