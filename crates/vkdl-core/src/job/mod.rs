//! Job descriptors: one per unique input URL, with the resolved options snapshot.

mod options;
mod outcome;

use std::collections::HashSet;
use std::sync::Arc;

pub use options::{
    parse_rate_limit, CookieSource, JobOptions, Quality, DEFAULT_FORMAT, DEFAULT_OUTPUT_TEMPLATE,
};
pub use outcome::{Outcome, OutcomeBuilder};

/// One fetch request. Immutable once built; consumed by exactly one scheduler slot.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    pub url: String,
    pub options: Arc<JobOptions>,
}

/// Build one descriptor per unique, non-empty URL, keeping first-appearance order.
pub fn build_jobs<I, S>(urls: I, options: Arc<JobOptions>) -> Vec<JobDescriptor>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    dedup_urls(urls)
        .into_iter()
        .map(|url| JobDescriptor {
            url,
            options: Arc::clone(&options),
        })
        .collect()
}

/// Trim, drop empties and deduplicate while preserving order.
pub fn dedup_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .map(|u| u.as_ref().trim().to_string())
        .filter(|u| !u.is_empty())
        .filter(|u| seen.insert(u.clone()))
        .collect()
}
