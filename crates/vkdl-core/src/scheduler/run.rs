//! Run one job: resolve, then transfer every item not yet archived.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::archive::CompletionArchive;
use crate::job::{JobDescriptor, Outcome, OutcomeBuilder};
use crate::retry::run_with_retry;
use crate::source::MediaSource;

/// Runs a single job to completion on the calling thread.
///
/// A resolution failure ends the job before any transfer. For a single item
/// the transfer error (after retries) fails the job; inside a collection,
/// item failures are logged and counted but the job still succeeds with the
/// full resolved item count. Archived items are skipped and never transferred.
/// `abort` is checked between items.
pub fn run_one_job(
    source: &dyn MediaSource,
    archive: &CompletionArchive,
    job: &JobDescriptor,
    abort: &AtomicBool,
) -> Outcome {
    let opts = job.options.as_ref();
    let mut outcome = OutcomeBuilder::new(job.url.as_str());

    let resolved = match source.resolve(&job.url, opts) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(url = %job.url, "resolve failed: {}", e);
            return outcome.fail(e);
        }
    };
    let title = resolved
        .title
        .clone()
        .or_else(|| resolved.items.first().and_then(|i| i.title.clone()));
    outcome.resolved(title, resolved.item_count());
    tracing::debug!(
        url = %job.url,
        items = resolved.item_count(),
        collection = resolved.is_collection,
        "resolved"
    );

    for item in &resolved.items {
        if abort.load(Ordering::SeqCst) {
            tracing::warn!(url = %job.url, "job aborted before remaining items");
            break;
        }

        let key = item.archive_key().filter(|_| opts.archive_enabled);
        if let Some(key) = &key {
            if archive.has(key) {
                tracing::debug!(url = %item.url, key = %key, "already in archive, skipping");
                outcome.item_skipped();
                continue;
            }
        }

        let result = run_with_retry(&opts.retry, |attempt| {
            if attempt > 1 {
                tracing::info!(url = %item.url, attempt, "retrying transfer");
            }
            source.transfer(item, opts)
        });

        match result {
            Ok(()) => {
                outcome.item_fetched();
                if let Some(key) = &key {
                    if let Err(e) = archive.add(key) {
                        tracing::warn!(key = %key, "could not record item in archive: {:#}", e);
                    }
                }
            }
            Err(e) if resolved.is_collection => {
                tracing::warn!(url = %job.url, item = %item.url, "item failed: {}", e);
                outcome.item_failed();
            }
            Err(e) => {
                tracing::warn!(url = %job.url, "transfer failed: {}", e);
                return outcome.fail(e);
            }
        }
    }

    outcome.succeed()
}
