//! Strongly typed per-job options handed to the media source client.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::retry::RetryPolicy;

pub const DEFAULT_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%(uploader)s/%(title)s [%(id)s].%(ext)s";

/// Quality preset; each maps to a fixed format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Best,
    P1080,
    P720,
    P480,
    P360,
    Worst,
}

impl Quality {
    pub fn format_selector(self) -> &'static str {
        match self {
            Quality::P1080 => "bestvideo[height<=1080]+bestaudio/best[height<=1080]/best",
            Quality::P720 => "bestvideo[height<=720]+bestaudio/best[height<=720]/best",
            Quality::P480 => "bestvideo[height<=480]+bestaudio/best[height<=480]/best",
            Quality::P360 => "bestvideo[height<=360]+bestaudio/best[height<=360]/best",
            Quality::Best => "bestvideo+bestaudio/best",
            Quality::Worst => "worstvideo+worstaudio/worst",
        }
    }
}

impl FromStr for Quality {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_end_matches('p') {
            "best" => Ok(Quality::Best),
            "1080" => Ok(Quality::P1080),
            "720" => Ok(Quality::P720),
            "480" => Ok(Quality::P480),
            "360" => Ok(Quality::P360),
            "worst" => Ok(Quality::Worst),
            _ => Err(ConfigError::Invalid(format!(
                "unknown quality '{s}' (expected best, 1080, 720, 480, 360 or worst)"
            ))),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quality::Best => "best",
            Quality::P1080 => "1080",
            Quality::P720 => "720",
            Quality::P480 => "480",
            Quality::P360 => "360",
            Quality::Worst => "worst",
        };
        f.write_str(s)
    }
}

/// Where the client takes login cookies from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CookieSource {
    #[default]
    None,
    /// Browser profile to extract cookies from ("chrome", "firefox", ...).
    Browser(String),
    /// Netscape-format cookies.txt.
    File(PathBuf),
}

/// Resolved configuration snapshot shared by every job of a run.
#[derive(Debug, Clone)]
pub struct JobOptions {
    pub format_selector: String,
    pub download_dir: PathBuf,
    /// Destination naming template, relative to `download_dir`, with client placeholders.
    pub output_template: String,
    pub rate_limit_bytes_per_sec: Option<u64>,
    pub cookie_source: CookieSource,
    pub archive_enabled: bool,
    pub quality: Option<Quality>,
    pub write_thumbnail: bool,
    pub write_description: bool,
    pub embed_metadata: bool,
    pub retry: RetryPolicy,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            format_selector: DEFAULT_FORMAT.to_string(),
            download_dir: PathBuf::from("./downloads"),
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            rate_limit_bytes_per_sec: None,
            cookie_source: CookieSource::None,
            archive_enabled: true,
            quality: None,
            write_thumbnail: true,
            write_description: false,
            embed_metadata: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl JobOptions {
    /// Full destination template: download dir joined with the naming template.
    pub fn output_path_template(&self) -> PathBuf {
        self.download_dir.join(&self.output_template)
    }
}

/// Parse a rate limit like `5M`, `500K`, `1.5M`, `2G` or `2048` into bytes/sec.
/// Suffixes are binary (K = 1024) and may be followed by `B` or `/s`.
pub fn parse_rate_limit(s: &str) -> Result<u64, ConfigError> {
    let trimmed = s.trim();
    let body = trimmed
        .trim_end_matches("/s")
        .trim_end_matches(['B', 'b']);
    let (number, multiplier) = match body.chars().last() {
        Some(c) if c.eq_ignore_ascii_case(&'k') => (&body[..body.len() - 1], 1024f64),
        Some(c) if c.eq_ignore_ascii_case(&'m') => (&body[..body.len() - 1], 1024f64 * 1024.0),
        Some(c) if c.eq_ignore_ascii_case(&'g') => {
            (&body[..body.len() - 1], 1024f64 * 1024.0 * 1024.0)
        }
        _ => (body, 1f64),
    };
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("invalid rate limit '{trimmed}'")))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "rate limit must be positive, got '{trimmed}'"
        )));
    }
    Ok((value * multiplier).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_suffixes() {
        assert_eq!(parse_rate_limit("2048").unwrap(), 2048);
        assert_eq!(parse_rate_limit("500K").unwrap(), 500 * 1024);
        assert_eq!(parse_rate_limit("5M").unwrap(), 5 * 1024 * 1024);
        assert_eq!(parse_rate_limit("1.5m").unwrap(), 1_572_864);
        assert_eq!(parse_rate_limit("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_rate_limit("5MB/s").unwrap(), 5 * 1024 * 1024);
    }

    #[test]
    fn rate_limit_rejects_garbage() {
        assert!(parse_rate_limit("fast").is_err());
        assert!(parse_rate_limit("0").is_err());
        assert!(parse_rate_limit("-3M").is_err());
        assert!(parse_rate_limit("").is_err());
    }

    #[test]
    fn quality_presets() {
        assert_eq!("720".parse::<Quality>().unwrap(), Quality::P720);
        assert_eq!("1080p".parse::<Quality>().unwrap(), Quality::P1080);
        assert_eq!("BEST".parse::<Quality>().unwrap(), Quality::Best);
        assert!("4k".parse::<Quality>().is_err());
        assert!(Quality::P480.format_selector().contains("height<=480"));
    }

    #[test]
    fn output_path_joins_dir_and_template() {
        let opts = JobOptions {
            download_dir: PathBuf::from("/data/vk"),
            output_template: "%(title)s.%(ext)s".into(),
            ..JobOptions::default()
        };
        assert_eq!(
            opts.output_path_template(),
            PathBuf::from("/data/vk/%(title)s.%(ext)s")
        );
    }
}
