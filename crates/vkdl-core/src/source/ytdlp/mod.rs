//! [`MediaSource`] backed by the `yt-dlp` executable.

mod args;
mod parse;

use std::io::ErrorKind;
use std::process::{Command, Output, Stdio};

use crate::job::JobOptions;
use crate::retry::{error_from_message, SourceError};

use super::{FormatInfo, MediaItem, MediaSource, Resolved};

/// Runs `yt-dlp` as a subprocess for every call.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[String]) -> Result<Output, SourceError> {
        tracing::debug!(program = %self.program, ?args, "spawning yt-dlp");
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group: a terminal Ctrl-C reaches vkdl only, so a stop
        // request never kills a transfer mid-stream.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd.output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SourceError::Unavailable(format!(
                    "'{}' not found; install yt-dlp or set ytdlp_path in config",
                    self.program
                )),
                _ => SourceError::Io(e),
            })
    }

    /// Run and return stdout, or a classified error built from stderr.
    fn run_checked(&self, args: &[String]) -> Result<String, SourceError> {
        let out = self.run(args)?;
        let stderr = String::from_utf8_lossy(&out.stderr);
        for line in stderr.lines().filter(|l| l.starts_with("WARNING")) {
            tracing::debug!("yt-dlp: {}", line);
        }
        if !out.status.success() {
            let message = parse::last_error_line(&stderr)
                .unwrap_or_else(|| format!("yt-dlp exited with {}", out.status));
            return Err(error_from_message(&message));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

fn check_url(url: &str) -> Result<(), SourceError> {
    match url::Url::parse(url) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(()),
        Ok(u) => Err(SourceError::InvalidUrl(format!(
            "unsupported scheme '{}': {}",
            u.scheme(),
            url
        ))),
        Err(e) => Err(SourceError::InvalidUrl(format!("{url}: {e}"))),
    }
}

impl MediaSource for YtDlp {
    fn resolve(&self, url: &str, options: &JobOptions) -> Result<Resolved, SourceError> {
        check_url(url)?;
        let stdout = self.run_checked(&args::resolve_args(url, options))?;
        parse::parse_resolved(&stdout, url)
    }

    fn transfer(&self, item: &MediaItem, options: &JobOptions) -> Result<(), SourceError> {
        self.run_checked(&args::transfer_args(&item.url, options))?;
        tracing::info!(url = %item.url, id = ?item.id, "item transferred");
        Ok(())
    }

    fn list_formats(&self, url: &str, options: &JobOptions) -> Result<Vec<FormatInfo>, SourceError> {
        check_url(url)?;
        let stdout = self.run_checked(&args::formats_args(url, options))?;
        parse::parse_formats(&stdout)
    }
}
