//! Dry-run and format listings.

use std::io::{self, Write};

use crate::scheduler::PlanRow;
use crate::source::FormatInfo;

use super::truncate;

/// `m:ss` (minutes are not wrapped into hours), `?` when unknown.
pub fn format_duration(secs: Option<f64>) -> String {
    match secs {
        Some(s) if s.is_finite() && s > 0.0 => {
            let s = s as u64;
            format!("{}:{:02}", s / 60, s % 60)
        }
        _ => "?".to_string(),
    }
}

pub fn render_plan<W: Write>(w: &mut W, rows: &[PlanRow]) -> io::Result<()> {
    writeln!(w, "Dry run: videos to download")?;
    writeln!(w, "{:<4} {:<50} {:>8}  {}", "#", "TITLE", "DURATION", "URL")?;
    let mut found = 0usize;
    let mut archived_count = 0usize;
    for (i, row) in rows.iter().enumerate() {
        match row {
            PlanRow::Item {
                title,
                duration_secs,
                url,
                archived,
            } => {
                found += 1;
                let note = if *archived {
                    archived_count += 1;
                    "  (archived)"
                } else {
                    ""
                };
                writeln!(
                    w,
                    "{:<4} {:<50} {:>8}  {}{}",
                    i + 1,
                    truncate(title.as_deref().unwrap_or("?"), 50),
                    format_duration(*duration_secs),
                    url,
                    note
                )?;
            }
            PlanRow::Error { url, message } => {
                writeln!(w, "{:<4} {:<50} {:>8}  {} ({})", i + 1, "ERROR", "-", url, message)?;
            }
        }
    }
    writeln!(w)?;
    if archived_count > 0 {
        writeln!(
            w,
            "Total: {found} video(s) found, {archived_count} already archived"
        )
    } else {
        writeln!(w, "Total: {found} video(s) found")
    }
}

fn format_size(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) => format!("{:.1} MiB", b as f64 / 1_048_576.0),
        None => "-".to_string(),
    }
}

pub fn render_formats<W: Write>(w: &mut W, url: &str, formats: &[FormatInfo]) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{url}")?;
    if formats.is_empty() {
        return writeln!(w, "  no formats reported");
    }
    writeln!(
        w,
        "  {:<16} {:<6} {:<12} {:>12}  {}",
        "ID", "EXT", "RESOLUTION", "SIZE", "NOTE"
    )?;
    for f in formats {
        writeln!(
            w,
            "  {:<16} {:<6} {:<12} {:>12}  {}",
            f.id,
            f.ext.as_deref().unwrap_or("-"),
            f.resolution.as_deref().unwrap_or("-"),
            format_size(f.filesize),
            f.note.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Some(754.0)), "12:34");
        assert_eq!(format_duration(Some(3700.9)), "61:40");
        assert_eq!(format_duration(Some(5.0)), "0:05");
        assert_eq!(format_duration(None), "?");
        assert_eq!(format_duration(Some(0.0)), "?");
    }

    #[test]
    fn plan_counts_items_not_errors() {
        let rows = vec![
            PlanRow::Item {
                title: Some("Clip".into()),
                duration_secs: Some(61.0),
                url: "https://vkvideo.ru/video1_1".into(),
                archived: false,
            },
            PlanRow::Error {
                url: "https://vkvideo.ru/video1_9".into(),
                message: "not found: gone".into(),
            },
            PlanRow::Item {
                title: None,
                duration_secs: None,
                url: "https://vkvideo.ru/video1_2".into(),
                archived: true,
            },
        ];
        let mut out = Vec::new();
        render_plan(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1:01  https://vkvideo.ru/video1_1"));
        assert!(text.contains("ERROR"));
        assert!(text.contains("https://vkvideo.ru/video1_9 (not found: gone)"));
        assert!(text.contains("https://vkvideo.ru/video1_2  (archived)"));
        assert!(text.ends_with("Total: 2 video(s) found, 1 already archived\n"));
    }

    #[test]
    fn formats_table() {
        let formats = vec![FormatInfo {
            id: "hls-720".into(),
            ext: Some("mp4".into()),
            resolution: Some("1280x720".into()),
            filesize: Some(3 * 1_048_576),
            note: Some("720p".into()),
        }];
        let mut out = Vec::new();
        render_formats(&mut out, "https://vkvideo.ru/video1_1", &formats).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("hls-720"));
        assert!(text.contains("3.0 MiB"));
        assert!(text.trim_end().ends_with("720p"));

        let mut out = Vec::new();
        render_formats(&mut out, "u", &[]).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("no formats reported"));
    }
}
