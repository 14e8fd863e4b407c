//! CLI command handlers, one file per mode.

mod download;
mod dry_run;
mod list_formats;
mod print_urls;

use anyhow::Result;
use vkdl_core::archive::CompletionArchive;
use vkdl_core::config::RunSettings;

pub use download::run_download;
pub use dry_run::run_dry_run;
pub use list_formats::run_list_formats;
pub use print_urls::run_print_urls;

/// The configured archive, or a disabled one under `--no-archive`.
fn open_archive(settings: &RunSettings) -> Result<CompletionArchive> {
    if !settings.options.archive_enabled {
        return Ok(CompletionArchive::disabled());
    }
    CompletionArchive::open(&settings.archive_file)
}
