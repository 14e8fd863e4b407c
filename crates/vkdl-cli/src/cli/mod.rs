//! CLI for the vkdl batch downloader.

mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use vkdl_core::config::{self, Overrides};
use vkdl_core::input::{self, UrlSources};
use vkdl_core::job::{build_jobs, Quality};
use vkdl_core::source::{MediaSource, YtDlp};

use commands::{run_download, run_dry_run, run_list_formats, run_print_urls};

/// Top-level CLI: one flat command, mode selected by flags.
#[derive(Debug, Parser)]
#[command(name = "vkdl", version)]
#[command(
    about = "vkdl: batch video downloader with bounded parallelism and a completion archive",
    long_about = None
)]
pub struct Cli {
    /// Video, playlist or channel URLs.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// File with one URL per line (blank lines and `#` comments ignored).
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Directory to save downloads into.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Quality preset: best, 1080, 720, 480, 360 or worst.
    #[arg(short = 'q', long, value_name = "Q", conflicts_with = "format")]
    pub quality: Option<Quality>,

    /// Raw yt-dlp format selector.
    #[arg(long, value_name = "SELECTOR")]
    pub format: Option<String>,

    /// yt-dlp output template for file names.
    #[arg(long, value_name = "TEMPLATE")]
    pub output_template: Option<String>,

    /// Number of URLs processed in parallel.
    #[arg(short = 'c', long = "concurrent", value_name = "N")]
    pub concurrent: Option<usize>,

    /// Browser to read login cookies from (chrome, firefox, ...).
    #[arg(long, value_name = "BROWSER")]
    pub cookies_browser: Option<String>,

    /// Netscape cookies.txt; used instead of the browser when it exists.
    #[arg(long, value_name = "FILE")]
    pub cookies_file: Option<PathBuf>,

    /// Bandwidth cap per transfer, e.g. 5M or 500K.
    #[arg(long, value_name = "RATE")]
    pub rate_limit: Option<String>,

    /// Fetch everything again, ignoring and not updating the archive.
    #[arg(long)]
    pub no_archive: bool,

    /// Completion archive file.
    #[arg(long, value_name = "FILE")]
    pub archive_file: Option<PathBuf>,

    /// Give up on a single URL after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub job_timeout: Option<u64>,

    /// Resolve URLs and list what would be downloaded, without downloading.
    #[arg(long, conflicts_with = "list_formats")]
    pub dry_run: bool,

    /// List the available formats of each URL and exit.
    #[arg(long)]
    pub list_formats: bool,

    /// Harvest video links from a saved HTML page.
    #[arg(long, value_name = "FILE")]
    pub from_html: Option<PathBuf>,

    /// Keep only harvested videos of this owner id (may be negative).
    #[arg(long, value_name = "ID", requires = "from_html", allow_hyphen_values = true)]
    pub owner: Option<String>,

    /// Print the collected URL list and exit.
    #[arg(long)]
    pub print_urls: bool,

    /// Write the URLs of failed jobs to FILE for a later rerun.
    #[arg(long, value_name = "FILE")]
    pub save_failed: Option<PathBuf>,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        Cli::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let urls = input::collect_urls(&self.url_sources())?;
        if self.print_urls {
            return run_print_urls(&urls);
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let settings = cfg.resolve(&self.overrides())?;

        let source: Arc<dyn MediaSource> = Arc::new(YtDlp::new(settings.ytdlp_path.as_str()));
        let jobs = build_jobs(urls, Arc::new(settings.options.clone()));

        if self.list_formats {
            run_list_formats(source, jobs).await
        } else if self.dry_run {
            run_dry_run(source, &settings, jobs).await
        } else {
            run_download(source, &settings, jobs, self.save_failed.as_deref()).await
        }
    }

    fn url_sources(&self) -> UrlSources {
        UrlSources {
            urls: self.urls.clone(),
            url_file: self.file.clone(),
            html_file: self.from_html.clone(),
            owner: self.owner.clone(),
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            download_dir: self.output_dir.clone(),
            format: self.format.clone(),
            quality: self.quality,
            output_template: self.output_template.clone(),
            max_concurrent: self.concurrent,
            cookies_browser: self.cookies_browser.clone(),
            cookies_file: self.cookies_file.clone(),
            rate_limit: self.rate_limit.clone(),
            no_archive: self.no_archive,
            archive_file: self.archive_file.clone(),
            job_timeout_secs: self.job_timeout,
        }
    }
}

#[cfg(test)]
mod tests;
