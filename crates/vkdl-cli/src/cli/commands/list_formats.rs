//! `vkdl --list-formats` – print available formats per URL.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::Arc;

use vkdl_core::job::JobDescriptor;
use vkdl_core::report;
use vkdl_core::source::MediaSource;

pub async fn run_list_formats(source: Arc<dyn MediaSource>, jobs: Vec<JobDescriptor>) -> Result<()> {
    let listings = tokio::task::spawn_blocking(move || {
        jobs.into_iter()
            .map(|job| {
                let res = source.list_formats(&job.url, &job.options);
                (job.url, res)
            })
            .collect::<Vec<_>>()
    })
    .await
    .context("list formats worker")?;

    let mut out = io::stdout().lock();
    for (url, res) in listings {
        match res {
            Ok(formats) => report::render_formats(&mut out, &url, &formats)?,
            Err(e) => {
                tracing::warn!(url = %url, "list formats failed: {}", e);
                writeln!(out, "ERROR {url}: {e}")?;
            }
        }
    }
    Ok(())
}
