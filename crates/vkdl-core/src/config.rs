use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::job::{
    parse_rate_limit, CookieSource, JobOptions, Quality, DEFAULT_FORMAT, DEFAULT_OUTPUT_TEMPLATE,
};
use crate::retry::{ExponentialBackoff, FixedDelay, RetryPolicy};

/// Invalid configuration detected before any job is scheduled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Invalid(String),
}

/// Wait strategy between retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

/// Retry policy parameters (`[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries per item transfer (not counting the first attempt).
    pub job_retries: u32,
    /// Retries per fragment inside one item transfer.
    pub fragment_retries: u32,
    /// Seconds between attempts (base delay when backoff is exponential).
    pub retry_delay_secs: f64,
    #[serde(default)]
    pub backoff: BackoffKind,
    /// Cap for exponential backoff, in seconds.
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

fn default_max_delay_secs() -> u64 {
    60
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            job_retries: 5,
            fragment_retries: 5,
            retry_delay_secs: 5.0,
            backoff: BackoffKind::Fixed,
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy, ConfigError> {
        if !self.retry_delay_secs.is_finite() || self.retry_delay_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "retry_delay_secs must be >= 0, got {}",
                self.retry_delay_secs
            )));
        }
        let delay = Duration::from_secs_f64(self.retry_delay_secs);
        let policy = RetryPolicy::new(self.job_retries, self.fragment_retries, FixedDelay(delay));
        Ok(match self.backoff {
            BackoffKind::Fixed => policy,
            BackoffKind::Exponential => policy.with_backoff(ExponentialBackoff {
                base: delay,
                max: Duration::from_secs(self.max_delay_secs),
            }),
        })
    }
}

/// Global configuration loaded from `~/.config/vkdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub download_dir: PathBuf,
    /// Parallel jobs.
    pub max_concurrent: usize,
    /// yt-dlp format selector.
    pub format: String,
    /// e.g. "5M" for 5 MiB/s; unset = unlimited.
    pub rate_limit: Option<String>,
    /// Browser to extract cookies from; unset = public videos only.
    pub cookies_browser: Option<String>,
    /// Netscape cookies.txt; takes precedence over `cookies_browser` when it exists.
    pub cookies_file: Option<PathBuf>,
    pub output_template: String,
    /// Completion archive (skip already fetched items).
    pub archive_file: PathBuf,
    pub write_thumbnail: bool,
    pub write_description: bool,
    pub embed_metadata: bool,
    /// Path or name of the yt-dlp executable.
    pub ytdlp_path: String,
    /// Give up on a job after this many seconds (unset = no limit).
    pub job_timeout_secs: Option<u64>,
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("./downloads"),
            max_concurrent: 3,
            format: DEFAULT_FORMAT.to_string(),
            rate_limit: None,
            cookies_browser: Some("chrome".to_string()),
            cookies_file: None,
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            archive_file: PathBuf::from("./downloaded.txt"),
            write_thumbnail: true,
            write_description: false,
            embed_metadata: true,
            ytdlp_path: "yt-dlp".to_string(),
            job_timeout_secs: None,
            retry: RetryConfig::default(),
        }
    }
}

/// Per-run overrides, typically from CLI flags. `None` keeps the config value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub download_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub quality: Option<Quality>,
    pub output_template: Option<String>,
    pub max_concurrent: Option<usize>,
    pub cookies_browser: Option<String>,
    pub cookies_file: Option<PathBuf>,
    pub rate_limit: Option<String>,
    pub no_archive: bool,
    pub archive_file: Option<PathBuf>,
    pub job_timeout_secs: Option<u64>,
}

/// Everything the scheduler needs for one run, validated.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub options: JobOptions,
    pub max_concurrent: usize,
    pub archive_file: PathBuf,
    pub job_timeout: Option<Duration>,
    pub ytdlp_path: String,
}

impl Config {
    /// Merge overrides into this config and validate the result once.
    pub fn resolve(&self, ov: &Overrides) -> Result<RunSettings, ConfigError> {
        let max_concurrent = ov.max_concurrent.unwrap_or(self.max_concurrent);
        if max_concurrent == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }

        let mut format_selector = ov.format.clone().unwrap_or_else(|| self.format.clone());
        if let Some(q) = ov.quality {
            format_selector = q.format_selector().to_string();
        }
        if format_selector.trim().is_empty() {
            return Err(ConfigError::Invalid("format selector must not be empty".into()));
        }

        let output_template = ov
            .output_template
            .clone()
            .unwrap_or_else(|| self.output_template.clone());
        if output_template.trim().is_empty() {
            return Err(ConfigError::Invalid("output template must not be empty".into()));
        }

        let rate_limit_bytes_per_sec = ov
            .rate_limit
            .as_deref()
            .or(self.rate_limit.as_deref())
            .map(parse_rate_limit)
            .transpose()?;

        let cookies_file = ov.cookies_file.as_ref().or(self.cookies_file.as_ref());
        let cookies_browser = ov.cookies_browser.as_ref().or(self.cookies_browser.as_ref());
        let cookie_source = match (cookies_file, cookies_browser) {
            (Some(file), _) if file.exists() => CookieSource::File(file.clone()),
            (_, Some(browser)) if !browser.trim().is_empty() => {
                CookieSource::Browser(browser.trim().to_string())
            }
            _ => CookieSource::None,
        };

        let job_timeout = match ov.job_timeout_secs.or(self.job_timeout_secs) {
            Some(0) => return Err(ConfigError::Invalid("job timeout must be at least 1s".into())),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let options = JobOptions {
            format_selector,
            download_dir: ov
                .download_dir
                .clone()
                .unwrap_or_else(|| self.download_dir.clone()),
            output_template,
            rate_limit_bytes_per_sec,
            cookie_source,
            archive_enabled: !ov.no_archive,
            quality: ov.quality,
            write_thumbnail: self.write_thumbnail,
            write_description: self.write_description,
            embed_metadata: self.embed_metadata,
            retry: self.retry.to_policy()?,
        };

        Ok(RunSettings {
            options,
            max_concurrent,
            archive_file: ov
                .archive_file
                .clone()
                .unwrap_or_else(|| self.archive_file.clone()),
            job_timeout,
            ytdlp_path: self.ytdlp_path.clone(),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vkdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Config> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<Config> {
    if !path.exists() {
        let default_cfg = Config::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
