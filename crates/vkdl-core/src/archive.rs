//! Completion archive: durable set of item identifiers already fetched.
//!
//! Stored as a flat text file, one identifier per line, append-only. The line
//! format (`<extractor> <id>`) matches yt-dlp's own `--download-archive`
//! file, so an existing archive keeps working. Deleting the file forces a
//! full re-fetch.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Thread-safe archive handle shared by all workers of a run.
///
/// `add` calls are serialized by a mutex so lines never interleave. When the
/// archive is disabled, `has` is always false, `add` is a no-op and the file
/// on disk is never opened.
#[derive(Debug)]
pub struct CompletionArchive {
    inner: Option<Mutex<ArchiveState>>,
}

#[derive(Debug)]
struct ArchiveState {
    path: PathBuf,
    ids: HashSet<String>,
    /// Opened on first append so a run that completes nothing leaves no file.
    file: Option<File>,
    /// Existing file ended without a newline (interrupted write).
    needs_newline: bool,
}

impl CompletionArchive {
    /// Load the archive at `path` (missing file = empty archive).
    pub fn open(path: &Path) -> Result<Self> {
        let (ids, needs_newline) = match fs::read_to_string(path) {
            Ok(data) => {
                let ids = data
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect::<HashSet<_>>();
                (ids, !data.is_empty() && !data.ends_with('\n'))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => (HashSet::new(), false),
            Err(e) => {
                return Err(e).with_context(|| format!("read archive: {}", path.display()))
            }
        };
        tracing::debug!(path = %path.display(), entries = ids.len(), "loaded completion archive");
        Ok(Self {
            inner: Some(Mutex::new(ArchiveState {
                path: path.to_path_buf(),
                ids,
                file: None,
                needs_newline,
            })),
        })
    }

    /// Archive consultation turned off for this run (forced re-fetch).
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.inner.as_ref().map(|m| lock(m).path.clone())
    }

    /// Number of identifiers currently known.
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |m| lock(m).ids.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has(&self, id: &str) -> bool {
        match &self.inner {
            Some(m) => lock(m).ids.contains(id.trim()),
            None => false,
        }
    }

    /// Record `id` as durably fetched. Returns true if a new line was written.
    pub fn add(&self, id: &str) -> Result<bool> {
        let Some(m) = &self.inner else {
            return Ok(false);
        };
        let id = id.trim();
        if id.is_empty() || id.contains(['\n', '\r']) {
            anyhow::bail!("invalid archive identifier: {:?}", id);
        }

        let mut state = lock(m);
        if state.ids.contains(id) {
            return Ok(false);
        }
        if state.file.is_none() {
            if let Some(parent) = state.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create dir: {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&state.path)
                .with_context(|| format!("open archive: {}", state.path.display()))?;
            state.file = Some(file);
        }

        let line = if state.needs_newline {
            format!("\n{id}\n")
        } else {
            format!("{id}\n")
        };
        if let Some(file) = state.file.as_mut() {
            file.write_all(line.as_bytes())
                .and_then(|_| file.flush())
                .and_then(|_| file.sync_data())
                .context("append to archive")?;
        }
        state.needs_newline = false;
        state.ids.insert(id.to_string());
        Ok(true)
    }
}

/// A panicked writer cannot leave a partial line behind (the set is only
/// updated after the write), so a poisoned lock is safe to reuse.
fn lock(m: &Mutex<ArchiveState>) -> MutexGuard<'_, ArchiveState> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}
