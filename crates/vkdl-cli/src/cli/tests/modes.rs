//! Tests for mode flags and URL sources.

use super::parse;
use clap::Parser;
use std::fs;
use std::path::Path;

#[test]
fn cli_parse_dry_run_and_list_formats() {
    assert!(parse(&["vkdl", "--dry-run", "u"]).dry_run);
    assert!(parse(&["vkdl", "--list-formats", "u"]).list_formats);
    assert!(super::Cli::try_parse_from(["vkdl", "--dry-run", "--list-formats", "u"]).is_err());
}

#[test]
fn cli_parse_html_harvest_with_negative_owner() {
    let cli = parse(&[
        "vkdl",
        "--from-html",
        "page.html",
        "--owner",
        "-12345",
        "--print-urls",
    ]);
    assert_eq!(cli.from_html.as_deref(), Some(Path::new("page.html")));
    assert_eq!(cli.owner.as_deref(), Some("-12345"));
    assert!(cli.print_urls);
}

#[test]
fn cli_owner_requires_html() {
    assert!(super::Cli::try_parse_from(["vkdl", "--owner", "1", "u"]).is_err());
}

#[test]
fn cli_parse_save_failed() {
    let cli = parse(&["vkdl", "--save-failed", "failed.txt", "u"]);
    assert_eq!(cli.save_failed.as_deref(), Some(Path::new("failed.txt")));
}

#[test]
fn cli_url_sources_merge_file_and_args() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("urls.txt");
    fs::write(&list, "# saved\nhttps://a\n\nhttps://b\nhttps://a\n").unwrap();
    let list_arg = list.to_str().unwrap();

    let cli = parse(&["vkdl", "https://b", "https://c", "-f", list_arg]);
    let urls = vkdl_core::input::collect_urls(&cli.url_sources()).unwrap();
    assert_eq!(urls, ["https://b", "https://c", "https://a"]);
}

#[tokio::test]
async fn cli_run_without_urls_is_an_error() {
    let err = parse(&["vkdl"]).run().await.unwrap_err();
    assert!(err.to_string().contains("no URLs provided"));
}

#[tokio::test]
async fn cli_run_with_missing_file_is_an_error() {
    let err = parse(&["vkdl", "-f", "/nonexistent/vkdl-urls.txt"])
        .run()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("file not found"));
}
