use std::io::{self, Write};

use tokio::sync::mpsc;

use crate::job::Outcome;

/// Append-only live view: a `[done/total]` status line per Outcome, written
/// the moment it arrives. Lines are never rewritten or reordered.
pub struct LiveReporter<W> {
    sink: W,
    total: usize,
    completed: usize,
    succeeded: usize,
}

impl<W: Write> LiveReporter<W> {
    pub fn new(sink: W, total: usize) -> Self {
        Self {
            sink,
            total,
            completed: 0,
            succeeded: 0,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.completed - self.succeeded
    }

    pub fn record(&mut self, outcome: &Outcome) -> io::Result<()> {
        self.completed += 1;
        if outcome.success() {
            self.succeeded += 1;
        }
        let line = status_line(self.completed, self.total, outcome);
        writeln!(self.sink, "{line}")?;
        self.sink.flush()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// `[3/10] ✓ Title (5 video(s), 2 already archived)` or `[3/10] ✗ url: reason`.
pub fn status_line(done: usize, total: usize, outcome: &Outcome) -> String {
    if !outcome.success() {
        return format!(
            "[{done}/{total}] ✗ {}: {}",
            outcome.url(),
            outcome.error().unwrap_or("unknown")
        );
    }
    let mut detail = format!("{} video(s)", outcome.item_count());
    if outcome.skipped() > 0 {
        detail.push_str(&format!(", {} already archived", outcome.skipped()));
    }
    if outcome.failed_items() > 0 {
        detail.push_str(&format!(", {} failed", outcome.failed_items()));
    }
    format!("[{done}/{total}] ✓ {} ({detail})", outcome.display_name())
}

/// Consume the outcome channel until the scheduler drops its sender.
pub async fn drive<W: Write>(
    mut rx: mpsc::Receiver<Outcome>,
    mut reporter: LiveReporter<W>,
) -> LiveReporter<W> {
    while let Some(outcome) = rx.recv().await {
        if let Err(e) = reporter.record(&outcome) {
            tracing::warn!("could not write status line: {}", e);
        }
    }
    reporter
}
