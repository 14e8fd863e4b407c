//! `vkdl URL...` – run the batch and report each job as it finishes.

use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use vkdl_core::config::RunSettings;
use vkdl_core::control::BatchControl;
use vkdl_core::job::JobDescriptor;
use vkdl_core::report::{self, LiveReporter};
use vkdl_core::scheduler::{self, BatchContext};
use vkdl_core::source::MediaSource;

use super::open_archive;

pub async fn run_download(
    source: Arc<dyn MediaSource>,
    settings: &RunSettings,
    jobs: Vec<JobDescriptor>,
    save_failed: Option<&Path>,
) -> Result<()> {
    let started = Instant::now();
    let total = jobs.len();
    let download_dir = &settings.options.download_dir;
    std::fs::create_dir_all(download_dir)
        .with_context(|| format!("create output dir: {}", download_dir.display()))?;

    let archive = Arc::new(open_archive(settings)?);
    println!("URLs to process: {}", total);
    println!("Output directory: {}", download_dir.display());
    if let Some(path) = archive.path() {
        println!("Archive: {} ({} entries)", path.display(), archive.len());
    }
    println!();

    let control = Arc::new(BatchControl::new());
    let stop = Arc::clone(&control);
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping: running jobs will finish, no new ones start.");
            stop.request_stop();
        }
    });

    let ctx = BatchContext::new(source, archive)
        .with_control(Arc::clone(&control))
        .with_job_timeout(settings.job_timeout);

    let (outcome_tx, outcome_rx) = tokio::sync::mpsc::channel(total.max(1));
    let reporter = tokio::spawn(report::drive(
        outcome_rx,
        LiveReporter::new(io::stdout(), total),
    ));

    let outcomes = scheduler::run_batch(&ctx, jobs, settings.max_concurrent, Some(outcome_tx)).await;
    reporter.await.context("status reporter")?;
    signal_task.abort();

    let summary = report::render_summary(&mut io::stdout().lock(), &outcomes)?;
    if control.is_stopped() && outcomes.len() < total {
        println!("Stopped early: {} URL(s) not started.", total - outcomes.len());
    }
    if let Some(path) = save_failed {
        let n = report::write_failed_list(path, &outcomes)?;
        if n > 0 {
            println!("Saved {} failed URL(s) to {}", n, path.display());
        }
    }

    let elapsed = started.elapsed();
    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        elapsed_secs = elapsed.as_secs_f64(),
        "batch complete"
    );
    println!("Completed in {:.1}s", elapsed.as_secs_f64());
    Ok(())
}
