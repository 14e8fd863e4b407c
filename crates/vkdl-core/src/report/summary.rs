//! Final summary table and failed-subset export.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::job::Outcome;

use super::truncate;

const NAME_WIDTH: usize = 60;

/// Aggregate counts of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success()).count();
        Self {
            succeeded,
            failed: outcomes.len() - succeeded,
            total: outcomes.len(),
        }
    }
}

/// Print the summary table (index, title-or-url, item count, status) and totals.
/// Indexes follow the order of `outcomes`, so failures can be picked out by number.
pub fn render_summary<W: Write>(w: &mut W, outcomes: &[Outcome]) -> io::Result<BatchSummary> {
    writeln!(w)?;
    writeln!(w, "Download Summary")?;
    writeln!(
        w,
        "{:<4} {:<width$} {:>6}  {}",
        "#",
        "TITLE / URL",
        "VIDEOS",
        "STATUS",
        width = NAME_WIDTH
    )?;
    for (i, o) in outcomes.iter().enumerate() {
        let status = match o.error() {
            None => "OK".to_string(),
            Some(reason) => format!("FAIL: {reason}"),
        };
        writeln!(
            w,
            "{:<4} {:<width$} {:>6}  {}",
            i + 1,
            truncate(o.display_name(), NAME_WIDTH),
            o.item_count(),
            status,
            width = NAME_WIDTH
        )?;
    }

    let summary = BatchSummary::from_outcomes(outcomes);
    writeln!(w)?;
    writeln!(
        w,
        "Total: {} succeeded, {} failed, {} total",
        summary.succeeded, summary.failed, summary.total
    )?;
    Ok(summary)
}

pub fn failed_urls(outcomes: &[Outcome]) -> Vec<&str> {
    outcomes
        .iter()
        .filter(|o| !o.success())
        .map(|o| o.url())
        .collect()
}

/// Write failed URLs one per line, ready to be fed back with `-f`.
/// Returns how many were written.
pub fn write_failed_list(path: &Path, outcomes: &[Outcome]) -> Result<usize> {
    let failed = failed_urls(outcomes);
    let mut body = failed.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(path, body).with_context(|| format!("write failed URL list: {}", path.display()))?;
    Ok(failed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::OutcomeBuilder;

    fn outcomes() -> Vec<Outcome> {
        let mut a = OutcomeBuilder::new("https://vkvideo.ru/video1_1");
        a.resolved(Some("First clip".into()), 1);
        let b = OutcomeBuilder::new("https://vkvideo.ru/video1_2").fail("not found: removed");
        let mut c = OutcomeBuilder::new("https://vkvideo.ru/@chan");
        c.resolved(Some("Channel".into()), 12);
        vec![a.succeed(), b, c.succeed()]
    }

    #[test]
    fn table_lists_every_job_and_totals() {
        let mut out = Vec::new();
        let summary = render_summary(&mut out, &outcomes()).unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                succeeded: 2,
                failed: 1,
                total: 3
            }
        );
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().filter(|l| l.starts_with(char::is_numeric)).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("1    First clip"));
        assert!(rows[0].ends_with("     1  OK"));
        assert!(rows[1].contains("https://vkvideo.ru/video1_2"));
        assert!(rows[1].ends_with("FAIL: not found: removed"));
        assert!(rows[2].contains("    12  OK"));
        assert!(text.ends_with("Total: 2 succeeded, 1 failed, 3 total\n"));
    }

    #[test]
    fn failed_subset_roundtrips_through_a_list_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed.txt");
        assert_eq!(write_failed_list(&path, &outcomes()).unwrap(), 1);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(crate::input::parse_url_list(&text), ["https://vkvideo.ru/video1_2"]);
    }
}
