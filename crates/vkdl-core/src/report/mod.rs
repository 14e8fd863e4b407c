//! Result aggregation and rendering.
//!
//! `live` prints one line per finished job while the batch runs; `summary`
//! renders the final table; `tables` renders dry-run and format listings.
//! Everything writes to a caller-supplied `io::Write` sink.

mod live;
mod summary;
mod tables;

pub use live::{drive, status_line, LiveReporter};
pub use summary::{failed_urls, render_summary, write_failed_list, BatchSummary};
pub use tables::{format_duration, render_formats, render_plan};

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("короткий", 10), "короткий");
        assert_eq!(truncate("очень длинное название", 6), "очень…");
    }
}
