//! Media source client seam.
//!
//! The scheduler only talks to a [`MediaSource`]: resolve a URL into metadata
//! and items, then transfer items one by one. The shipped implementation
//! drives the `yt-dlp` executable ([`YtDlp`]); tests plug in scripted sources.

mod ytdlp;

use crate::job::JobOptions;
use crate::retry::SourceError;

pub use ytdlp::YtDlp;

/// One concrete media resource behind a job URL.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    /// Extractor-specific id (e.g. `4725344_14264835`).
    pub id: Option<String>,
    /// Extractor name (e.g. `VK`); part of the archive key.
    pub extractor: Option<String>,
    pub title: Option<String>,
    /// Page URL of this item; equals the job URL for single items.
    pub url: String,
    pub duration_secs: Option<f64>,
}

impl MediaItem {
    /// Identifier used in the completion archive: `"<extractor> <id>"`,
    /// lowercase extractor, like yt-dlp's download archive. None when the
    /// source did not expose enough to identify the item.
    pub fn archive_key(&self) -> Option<String> {
        let id = self.id.as_deref()?.trim();
        let extractor = self.extractor.as_deref()?.trim();
        if id.is_empty() || extractor.is_empty() {
            return None;
        }
        Some(format!("{} {}", extractor.to_lowercase(), id))
    }
}

/// Metadata for a job URL: one item or an expandable collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub is_collection: bool,
    pub title: Option<String>,
    pub items: Vec<MediaItem>,
}

impl Resolved {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// One downloadable format as reported by the source.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatInfo {
    pub id: String,
    pub ext: Option<String>,
    pub resolution: Option<String>,
    pub filesize: Option<u64>,
    pub note: Option<String>,
}

/// Capability that turns URLs into metadata and performs transfers.
///
/// Calls are blocking; the scheduler runs each job on its own blocking
/// worker thread. Implementations must be shareable across workers.
pub trait MediaSource: Send + Sync + 'static {
    /// Fetch metadata without transferring anything.
    fn resolve(&self, url: &str, options: &JobOptions) -> Result<Resolved, SourceError>;

    /// Transfer one resolved item. `Ok` means the item is durably on disk.
    fn transfer(&self, item: &MediaItem, options: &JobOptions) -> Result<(), SourceError>;

    /// Available formats for `url`, without transferring.
    fn list_formats(&self, url: &str, options: &JobOptions) -> Result<Vec<FormatInfo>, SourceError>;
}
