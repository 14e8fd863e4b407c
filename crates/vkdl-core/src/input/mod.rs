//! Collect job URLs from CLI arguments, URL list files and saved HTML pages.
//!
//! Problems here are input errors: fatal, reported before any scheduling.

mod html;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::job::dedup_urls;

pub use html::extract_video_urls;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no URLs provided; pass URLs as arguments or use -f FILE")]
    NoUrls,
}

/// Where URLs come from for one run.
#[derive(Debug, Clone, Default)]
pub struct UrlSources {
    pub urls: Vec<String>,
    /// Newline-delimited list; blank lines and `#` comments ignored.
    pub url_file: Option<PathBuf>,
    /// Saved HTML page to harvest video links from.
    pub html_file: Option<PathBuf>,
    /// Keep only harvested videos of this owner id.
    pub owner: Option<String>,
}

/// Merge all sources, deduplicate (first appearance wins) and require at least one URL.
pub fn collect_urls(sources: &UrlSources) -> Result<Vec<String>, InputError> {
    let mut urls = sources.urls.clone();

    if let Some(path) = &sources.url_file {
        urls.extend(parse_url_list(&read_input(path)?));
    }
    if let Some(path) = &sources.html_file {
        let html = read_input(path)?;
        urls.extend(extract_video_urls(&html, sources.owner.as_deref()));
    }

    let unique = dedup_urls(urls);
    if unique.is_empty() {
        return Err(InputError::NoUrls);
    }
    tracing::debug!(count = unique.len(), "collected URLs");
    Ok(unique)
}

/// URLs from a list file body: trimmed, skipping blank and `#` lines.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn read_input(path: &Path) -> Result<String, InputError> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(InputError::FileNotFound(path.to_path_buf())),
        Err(source) => Err(InputError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
