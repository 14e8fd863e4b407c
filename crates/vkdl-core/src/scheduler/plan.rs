//! Dry run: resolve every job and list the items a real run would fetch.

use crate::archive::CompletionArchive;
use crate::job::JobDescriptor;
use crate::source::MediaSource;

/// One line of a dry-run listing.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanRow {
    Item {
        title: Option<String>,
        duration_secs: Option<f64>,
        url: String,
        /// Already in the completion archive; a real run would skip it.
        archived: bool,
    },
    Error {
        url: String,
        message: String,
    },
}

/// Resolve each job in order without transferring anything.
pub fn plan_batch(
    source: &dyn MediaSource,
    archive: &CompletionArchive,
    jobs: &[JobDescriptor],
) -> Vec<PlanRow> {
    let mut rows = Vec::new();
    for job in jobs {
        match source.resolve(&job.url, &job.options) {
            Ok(resolved) => {
                rows.extend(resolved.items.into_iter().map(|item| {
                    let archived = job.options.archive_enabled
                        && item.archive_key().is_some_and(|k| archive.has(&k));
                    PlanRow::Item {
                        title: item.title,
                        duration_secs: item.duration_secs,
                        url: item.url,
                        archived,
                    }
                }));
            }
            Err(e) => rows.push(PlanRow::Error {
                url: job.url.clone(),
                message: e.to_string(),
            }),
        }
    }
    rows
}
