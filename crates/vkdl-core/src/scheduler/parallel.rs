//! Run a batch with up to `max_concurrent` jobs in flight.
//!
//! Jobs are admitted in input order; when one finishes, the next queued job
//! is started until the queue is empty or a stop was requested. Each job runs
//! start to finish on its own blocking worker thread.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle, JoinSet};

use crate::archive::CompletionArchive;
use crate::job::{JobDescriptor, Outcome, OutcomeBuilder};
use crate::source::MediaSource;

use super::run::run_one_job;
use super::BatchContext;

/// Runs `jobs` and returns their Outcomes in completion order (input order
/// when `max_concurrent == 1`). Every Outcome is also sent to `outcome_tx`
/// the moment it is available.
///
/// Jobs not yet started when [`BatchControl::request_stop`](crate::control::BatchControl::request_stop)
/// is called are dropped without an Outcome.
///
/// A job that exceeds the timeout is reported at once, but its slot stays
/// taken until the blocking worker returns, so no more than `max_concurrent`
/// workers ever run.
pub async fn run_batch(
    ctx: &BatchContext,
    jobs: Vec<JobDescriptor>,
    max_concurrent: usize,
    outcome_tx: Option<mpsc::Sender<Outcome>>,
) -> Vec<Outcome> {
    let max_concurrent = max_concurrent.max(1);
    let total = jobs.len();
    let mut queue = jobs.into_iter();
    let mut outcomes = Vec::with_capacity(total);
    let mut join_set: JoinSet<JobDone> = JoinSet::new();
    let mut running_urls: HashMap<task::Id, String> = HashMap::new();
    // Workers of timed-out jobs; they hold their slot until they return.
    let mut draining: JoinSet<()> = JoinSet::new();

    tracing::info!(total, max_concurrent, "starting batch");

    loop {
        while join_set.len() + draining.len() < max_concurrent && !ctx.control.is_stopped() {
            let Some(job) = queue.next() else {
                break;
            };
            let url = job.url.clone();
            let handle = join_set.spawn(run_job_task(
                Arc::clone(&ctx.source),
                Arc::clone(&ctx.archive),
                job,
                ctx.job_timeout,
            ));
            running_urls.insert(handle.id(), url);
        }

        if join_set.is_empty() && draining.is_empty() {
            break;
        }

        let outcome = tokio::select! {
            Some(res) = join_set.join_next_with_id(), if !join_set.is_empty() => match res {
                Ok((id, done)) => {
                    running_urls.remove(&id);
                    if let Some(worker) = done.worker {
                        draining.spawn(async move {
                            let _ = worker.await;
                        });
                    }
                    done.outcome
                }
                Err(e) => {
                    let url = running_urls.remove(&e.id()).unwrap_or_default();
                    tracing::error!(url = %url, "job task join: {}", e);
                    OutcomeBuilder::new(url).fail(format!("worker failed: {e}"))
                }
            },
            Some(_) = draining.join_next(), if !draining.is_empty() => {
                tracing::debug!("timed-out worker returned; slot released");
                continue;
            }
            else => break,
        };
        if let Some(tx) = &outcome_tx {
            // A dropped receiver only loses the live view; the result is still returned.
            let _ = tx.send(outcome.clone()).await;
        }
        outcomes.push(outcome);
    }

    let not_started = queue.len();
    if not_started > 0 {
        tracing::info!(not_started, "batch stopped before all jobs started");
    }
    tracing::info!(finished = outcomes.len(), total, "batch finished");
    outcomes
}

/// A finished job task. `worker` is set when the job timed out while its
/// blocking worker was still running.
struct JobDone {
    outcome: Outcome,
    worker: Option<JoinHandle<Outcome>>,
}

async fn run_job_task(
    source: Arc<dyn MediaSource>,
    archive: Arc<CompletionArchive>,
    job: JobDescriptor,
    timeout: Option<Duration>,
) -> JobDone {
    let url = job.url.clone();
    let abort = Arc::new(AtomicBool::new(false));
    let mut handle = tokio::task::spawn_blocking({
        let abort = Arc::clone(&abort);
        move || run_one_job(source.as_ref(), &archive, &job, &abort)
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                // The worker cannot be killed mid-transfer; stop it before its next item.
                abort.store(true, Ordering::SeqCst);
                tracing::warn!(url = %url, "job timed out after {:?}", limit);
                return JobDone {
                    outcome: OutcomeBuilder::new(url).fail(format!("timed out after {:?}", limit)),
                    worker: Some(handle),
                };
            }
        },
        None => (&mut handle).await,
    };

    let outcome = joined.unwrap_or_else(|e| {
        tracing::error!(url = %url, "job worker failed: {}", e);
        OutcomeBuilder::new(url).fail(format!("worker failed: {e}"))
    });
    JobDone {
        outcome,
        worker: None,
    }
}
