//! Parse yt-dlp JSON output and stderr.

use serde::Deserialize;

use crate::retry::SourceError;
use crate::source::{FormatInfo, MediaItem, Resolved};

#[derive(Debug, Deserialize)]
struct InfoJson {
    #[serde(rename = "_type")]
    kind: Option<String>,
    id: Option<String>,
    title: Option<String>,
    extractor_key: Option<String>,
    ie_key: Option<String>,
    webpage_url: Option<String>,
    url: Option<String>,
    duration: Option<f64>,
    entries: Option<Vec<Option<InfoJson>>>,
    #[serde(default)]
    formats: Vec<FormatJson>,
}

#[derive(Debug, Deserialize)]
struct FormatJson {
    format_id: String,
    ext: Option<String>,
    resolution: Option<String>,
    filesize: Option<u64>,
    filesize_approx: Option<u64>,
    format_note: Option<String>,
}

fn http_url(s: Option<&String>) -> Option<String> {
    s.filter(|u| u.starts_with("http://") || u.starts_with("https://"))
        .cloned()
}

pub fn parse_resolved(json: &str, job_url: &str) -> Result<Resolved, SourceError> {
    let info: InfoJson = serde_json::from_str(json)
        .map_err(|e| SourceError::Other(format!("could not parse metadata: {e}")))?;

    let is_collection = info.kind.as_deref() == Some("playlist") || info.entries.is_some();
    if !is_collection {
        let item = MediaItem {
            id: info.id,
            extractor: info.extractor_key.or(info.ie_key),
            title: info.title.clone(),
            url: http_url(info.webpage_url.as_ref()).unwrap_or_else(|| job_url.to_string()),
            duration_secs: info.duration,
        };
        return Ok(Resolved {
            is_collection: false,
            title: info.title,
            items: vec![item],
        });
    }

    let parent_extractor = info.extractor_key.clone().or(info.ie_key.clone());
    let mut items = Vec::new();
    for entry in info.entries.unwrap_or_default().into_iter().flatten() {
        let Some(url) = http_url(entry.webpage_url.as_ref()).or(http_url(entry.url.as_ref()))
        else {
            tracing::warn!(job_url, id = ?entry.id, "collection entry without URL skipped");
            continue;
        };
        items.push(MediaItem {
            id: entry.id,
            extractor: entry
                .ie_key
                .or(entry.extractor_key)
                .or(parent_extractor.clone()),
            title: entry.title,
            url,
            duration_secs: entry.duration,
        });
    }
    Ok(Resolved {
        is_collection: true,
        title: info.title,
        items,
    })
}

pub fn parse_formats(json: &str) -> Result<Vec<FormatInfo>, SourceError> {
    let info: InfoJson = serde_json::from_str(json)
        .map_err(|e| SourceError::Other(format!("could not parse metadata: {e}")))?;
    Ok(info
        .formats
        .into_iter()
        .map(|f| FormatInfo {
            id: f.format_id,
            ext: f.ext,
            resolution: f.resolution,
            filesize: f.filesize.or(f.filesize_approx),
            note: f.format_note,
        })
        .collect())
}

/// Last `ERROR:` line of stderr without the prefix, else the last non-empty line.
pub fn last_error_line(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    lines
        .iter()
        .rev()
        .find_map(|l| l.strip_prefix("ERROR:"))
        .map(|l| l.trim().to_string())
        .or_else(|| lines.last().map(|l| l.to_string()))
}
