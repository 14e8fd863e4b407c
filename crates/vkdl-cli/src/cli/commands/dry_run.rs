//! `vkdl --dry-run` – resolve every URL and list what a real run would fetch.

use anyhow::{Context, Result};
use std::io;
use std::sync::Arc;

use vkdl_core::config::RunSettings;
use vkdl_core::job::JobDescriptor;
use vkdl_core::report;
use vkdl_core::scheduler::plan_batch;
use vkdl_core::source::MediaSource;

use super::open_archive;

pub async fn run_dry_run(
    source: Arc<dyn MediaSource>,
    settings: &RunSettings,
    jobs: Vec<JobDescriptor>,
) -> Result<()> {
    let archive = open_archive(settings)?;
    println!("Resolving {} URL(s)...", jobs.len());
    let rows = tokio::task::spawn_blocking(move || plan_batch(source.as_ref(), &archive, &jobs))
        .await
        .context("dry run worker")?;
    report::render_plan(&mut io::stdout().lock(), &rows)?;
    Ok(())
}
