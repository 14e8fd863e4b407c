//! Media source error type for retry classification.

use thiserror::Error;

/// Error returned by a media source client (`resolve`, `transfer`, `list_formats`).
///
/// Variants carry the client's human-readable message so the final Outcome can
/// report it verbatim. [`classify`](super::classify) maps each variant to an
/// [`ErrorKind`](super::ErrorKind) for the retry decision.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connect or read timed out.
    #[error("timed out: {0}")]
    Timeout(String),
    /// Server asked us to slow down (HTTP 429 and friends).
    #[error("rate limited: {0}")]
    Throttled(String),
    /// Network-level failure (connection reset, DNS, TLS handshake).
    #[error("network error: {0}")]
    Network(String),
    /// HTTP error status reported by the client.
    #[error("HTTP {code}: {message}")]
    Http { code: u16, message: String },
    /// Resource does not exist (or is private/removed).
    #[error("not found: {0}")]
    NotFound(String),
    /// Login required or credentials rejected.
    #[error("authentication rejected: {0}")]
    Auth(String),
    /// URL is malformed or no extractor supports it.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// The client tool itself is missing or unusable (e.g. yt-dlp not installed).
    #[error("media client unavailable: {0}")]
    Unavailable(String),
    /// Local I/O failure while writing the item.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Any other failure reported by the client.
    #[error("{0}")]
    Other(String),
}
