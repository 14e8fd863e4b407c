//! `vkdl --print-urls` – print the collected URL set.

use anyhow::Result;
use std::io::{self, Write};

pub fn run_print_urls(urls: &[String]) -> Result<()> {
    let mut out = io::stdout().lock();
    for url in urls {
        writeln!(out, "{url}")?;
    }
    tracing::info!(count = urls.len(), "printed collected URLs");
    Ok(())
}
