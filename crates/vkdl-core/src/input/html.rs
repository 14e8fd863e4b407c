//! Harvest video links from a saved vkvideo.ru page.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// `https://vkvideo.ru/video{owner}_{id}`; owner is negative for groups.
fn video_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https://vkvideo\.ru/video(-?\d+)_\d+").expect("valid regex"))
}

/// Unique video URLs in first-seen order, optionally only those of `owner`.
pub fn extract_video_urls(html: &str, owner: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    video_re()
        .captures_iter(html)
        .filter(|c| owner.map_or(true, |o| c.get(1).map(|m| m.as_str()) == Some(o)))
        .filter_map(|c| c.get(0))
        .map(|m| m.as_str().to_string())
        .filter(|u| seen.insert(u.clone()))
        .collect()
}
