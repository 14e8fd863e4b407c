//! Command-line arguments for each yt-dlp invocation.

use crate::job::{CookieSource, JobOptions};

fn push_cookie_args(args: &mut Vec<String>, options: &JobOptions) {
    match &options.cookie_source {
        CookieSource::File(path) => {
            args.push("--cookies".into());
            args.push(path.display().to_string());
        }
        CookieSource::Browser(browser) => {
            args.push("--cookies-from-browser".into());
            args.push(browser.clone());
        }
        CookieSource::None => {}
    }
}

/// Metadata only: one JSON document, collections listed flat.
pub fn resolve_args(url: &str, options: &JobOptions) -> Vec<String> {
    let mut args: Vec<String> = vec!["-J".into(), "--flat-playlist".into()];
    push_cookie_args(&mut args, options);
    args.push("--".into());
    args.push(url.into());
    args
}

/// Transfer a single item. Job-level retries belong to the scheduler, so
/// yt-dlp's own whole-download retries are off; fragment retries are delegated.
pub fn transfer_args(item_url: &str, options: &JobOptions) -> Vec<String> {
    let retry = &options.retry;
    let mut args: Vec<String> = vec![
        "--no-playlist".into(),
        "--no-progress".into(),
        "-f".into(),
        options.format_selector.clone(),
        "-o".into(),
        options.output_path_template().display().to_string(),
        "--merge-output-format".into(),
        "mp4".into(),
        "--retries".into(),
        "0".into(),
        "--fragment-retries".into(),
        retry.fragment_retries.to_string(),
        "--retry-sleep".into(),
        format!("fragment:{}", retry.sleep_expr()),
    ];
    if let Some(rate) = options.rate_limit_bytes_per_sec {
        args.push("--limit-rate".into());
        args.push(rate.to_string());
    }
    push_cookie_args(&mut args, options);
    if options.write_thumbnail {
        args.push("--write-thumbnail".into());
        args.push("--embed-thumbnail".into());
    }
    if options.write_description {
        args.push("--write-description".into());
    }
    if options.embed_metadata {
        args.push("--embed-metadata".into());
    }
    args.push("--".into());
    args.push(item_url.into());
    args
}

/// Full metadata of a single item, including its format list.
pub fn formats_args(url: &str, options: &JobOptions) -> Vec<String> {
    let mut args: Vec<String> = vec!["-J".into(), "--no-playlist".into()];
    push_cookie_args(&mut args, options);
    args.push("--".into());
    args.push(url.into());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{ExponentialBackoff, FixedDelay, RetryPolicy};
    use std::path::PathBuf;
    use std::time::Duration;

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn transfer_args_carry_options() {
        let opts = JobOptions {
            format_selector: "best".into(),
            download_dir: PathBuf::from("/dl"),
            output_template: "%(id)s.%(ext)s".into(),
            rate_limit_bytes_per_sec: Some(1024),
            cookie_source: CookieSource::Browser("firefox".into()),
            write_thumbnail: false,
            write_description: true,
            embed_metadata: false,
            retry: RetryPolicy::new(3, 7, FixedDelay(Duration::from_secs(2))),
            ..JobOptions::default()
        };
        let args = transfer_args("https://vkvideo.ru/video1_2", &opts);
        assert_eq!(value_after(&args, "-f"), Some("best"));
        assert_eq!(value_after(&args, "-o"), Some("/dl/%(id)s.%(ext)s"));
        assert_eq!(value_after(&args, "--limit-rate"), Some("1024"));
        assert_eq!(value_after(&args, "--cookies-from-browser"), Some("firefox"));
        assert_eq!(value_after(&args, "--fragment-retries"), Some("7"));
        assert_eq!(value_after(&args, "--retries"), Some("0"));
        assert_eq!(value_after(&args, "--retry-sleep"), Some("fragment:2"));
        assert!(args.contains(&"--write-description".to_string()));
        assert!(!args.contains(&"--write-thumbnail".to_string()));
        assert!(!args.contains(&"--embed-metadata".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("https://vkvideo.ru/video1_2"));
    }

    #[test]
    fn exponential_backoff_reaches_fragment_sleep() {
        let opts = JobOptions {
            retry: RetryPolicy::new(5, 10, FixedDelay(Duration::ZERO)).with_backoff(
                ExponentialBackoff {
                    base: Duration::from_secs(5),
                    max: Duration::from_secs(60),
                },
            ),
            ..JobOptions::default()
        };
        let args = transfer_args("https://vkvideo.ru/video1_2", &opts);
        assert_eq!(value_after(&args, "--retry-sleep"), Some("fragment:exp=5:60"));
        assert_eq!(value_after(&args, "--fragment-retries"), Some("10"));
    }

    #[test]
    fn cookie_file_and_no_cookies() {
        let mut opts = JobOptions {
            cookie_source: CookieSource::File(PathBuf::from("cookies.txt")),
            ..JobOptions::default()
        };
        let args = resolve_args("https://vkvideo.ru/@chan", &opts);
        assert_eq!(value_after(&args, "--cookies"), Some("cookies.txt"));
        assert!(args.contains(&"--flat-playlist".to_string()));

        opts.cookie_source = CookieSource::None;
        let args = formats_args("https://vkvideo.ru/video1_2", &opts);
        assert!(!args.iter().any(|a| a.starts_with("--cookies")));
    }
}
