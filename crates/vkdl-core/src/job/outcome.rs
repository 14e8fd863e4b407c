use std::fmt;

/// Final, immutable report of one job. `error` is present iff the job failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    url: String,
    title: Option<String>,
    item_count: usize,
    fetched: usize,
    skipped: usize,
    failed_items: usize,
    error: Option<String>,
}

impl Outcome {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Title when known, else the source URL.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }

    /// Items the URL expanded to (0 if resolution failed).
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Items transferred during this run.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Items skipped because the archive already had them.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Items inside a collection that failed; never reflected in `error`.
    pub fn failed_items(&self) -> usize {
        self.failed_items
    }
}

/// Outcome under construction while a job runs.
#[derive(Debug)]
pub struct OutcomeBuilder {
    url: String,
    title: Option<String>,
    item_count: usize,
    fetched: usize,
    skipped: usize,
    failed_items: usize,
}

impl OutcomeBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            item_count: 0,
            fetched: 0,
            skipped: 0,
            failed_items: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn resolved(&mut self, title: Option<String>, item_count: usize) {
        self.title = title;
        self.item_count = item_count;
    }

    pub fn item_fetched(&mut self) {
        self.fetched += 1;
    }

    pub fn item_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn item_failed(&mut self) {
        self.failed_items += 1;
    }

    pub fn succeed(self) -> Outcome {
        self.freeze(None)
    }

    pub fn fail(self, reason: impl fmt::Display) -> Outcome {
        let mut reason = reason.to_string();
        if reason.trim().is_empty() {
            reason = "unknown error".to_string();
        }
        self.freeze(Some(reason))
    }

    fn freeze(self, error: Option<String>) -> Outcome {
        Outcome {
            url: self.url,
            title: self.title,
            item_count: self.item_count,
            fetched: self.fetched,
            skipped: self.skipped,
            failed_items: self.failed_items,
            error,
        }
    }
}
