//! Classify media source errors and client stderr into retry policy error kinds.

use super::error::SourceError;
use super::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u16) -> ErrorKind {
    match code {
        429 => ErrorKind::Throttled,
        408 => ErrorKind::Timeout,
        500..=599 => ErrorKind::Http5xx(code),
        _ => ErrorKind::Other,
    }
}

/// Classify a source error into an ErrorKind.
pub fn classify(e: &SourceError) -> ErrorKind {
    match e {
        SourceError::Timeout(_) => ErrorKind::Timeout,
        SourceError::Throttled(_) => ErrorKind::Throttled,
        SourceError::Network(_) => ErrorKind::Connection,
        SourceError::Http { code, .. } => classify_http_status(*code),
        SourceError::Io(_) => ErrorKind::Io,
        SourceError::NotFound(_)
        | SourceError::Auth(_)
        | SourceError::InvalidUrl(_)
        | SourceError::Unavailable(_)
        | SourceError::Other(_) => ErrorKind::Other,
    }
}

/// Turn a failure message from the client (e.g. the last `ERROR:` line of
/// yt-dlp stderr) into a typed error.
pub fn error_from_message(message: &str) -> SourceError {
    let msg = message.trim().to_string();
    let lower = msg.to_lowercase();

    if let Some(code) = http_status_in(&lower) {
        return match code {
            404 | 410 => SourceError::NotFound(msg),
            401 | 403 => SourceError::Auth(msg),
            429 => SourceError::Throttled(msg),
            _ => SourceError::Http { code, message: msg },
        };
    }
    if lower.contains("timed out") || lower.contains("timeout") {
        return SourceError::Timeout(msg);
    }
    if lower.contains("too many requests") || lower.contains("rate limit") {
        return SourceError::Throttled(msg);
    }
    if lower.contains("connection")
        || lower.contains("network is unreachable")
        || lower.contains("name or service not known")
        || lower.contains("temporary failure in name resolution")
        || lower.contains("incomplete read")
        || lower.contains("temporarily")
    {
        return SourceError::Network(msg);
    }
    if lower.contains("unsupported url") || lower.contains("is not a valid url") {
        return SourceError::InvalidUrl(msg);
    }
    if lower.contains("login")
        || lower.contains("sign in")
        || lower.contains("cookies")
        || lower.contains("authenticat")
    {
        return SourceError::Auth(msg);
    }
    if lower.contains("not found")
        || lower.contains("does not exist")
        || lower.contains("private video")
        || lower.contains("has been removed")
        || lower.contains("unavailable")
    {
        return SourceError::NotFound(msg);
    }
    SourceError::Other(msg)
}

fn http_status_in(lower: &str) -> Option<u16> {
    let rest = &lower[lower.find("http error ")? + "http error ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
