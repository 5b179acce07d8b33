//! Tables and labels for saved resumes and jobs.

use std::fmt::Write;

use chrono::{DateTime, Local};
use colored::Colorize;

use crate::models::history::{HistoryEntry, SavedJob, SavedResume};

const ID_WIDTH: usize = 8;
const NAME_WIDTH: usize = 28;

/// Local date and time, minute precision.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn short_id(id: &str) -> &str {
    id.get(..ID_WIDTH).unwrap_or(id)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// One-line label used by selection menus.
pub fn entry_label<T: HistoryEntry>(entry: &T) -> String {
    format!(
        "{}  {}  ({})",
        short_id(entry.id()),
        entry.name(),
        format_timestamp(entry.timestamp())
    )
}

pub fn render_resumes(resumes: &[SavedResume]) -> String {
    if resumes.is_empty() {
        return format!("{}\n", "No saved resumes.".dimmed());
    }
    let mut out = header("Chars");
    for r in resumes {
        let _ = writeln!(
            out,
            "{:<10} {:<30} {:<18} {}",
            short_id(&r.id).yellow(),
            truncate(&r.name, NAME_WIDTH),
            format_timestamp(r.timestamp),
            r.content.chars().count()
        );
    }
    out
}

pub fn render_jobs(jobs: &[SavedJob]) -> String {
    if jobs.is_empty() {
        return format!("{}\n", "No saved jobs.".dimmed());
    }
    let mut out = header("URL");
    for j in jobs {
        let _ = writeln!(
            out,
            "{:<10} {:<30} {:<18} {}",
            short_id(&j.id).yellow(),
            truncate(&j.name, NAME_WIDTH),
            format_timestamp(j.timestamp),
            if j.url.is_empty() { "-" } else { j.url.as_str() }
        );
    }
    out
}

fn header(last: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:<30} {:<18} {}", "ID", "Name", "Saved", last);
    let _ = writeln!(out, "{}", "─".repeat(72));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_and_truncate() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(truncate("Senior Product Manager", 10), "Senior Pr…");
        assert_eq!(truncate("PM", 10), "PM");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(i64::MAX), "unknown");
        assert_eq!(format_timestamp(0).len(), "1970-01-01 00:00".len());
    }

    #[test]
    fn test_render_jobs_shows_dash_without_url() {
        let jobs = vec![SavedJob {
            id: "11111111-2222".into(),
            name: "Acme".into(),
            content: "jd".into(),
            url: String::new(),
            timestamp: 0,
        }];
        let text = render_jobs(&jobs);
        assert!(text.contains("Acme"));
        assert!(text.trim_end().ends_with('-'));
    }

    #[test]
    fn test_empty_lists() {
        assert!(render_resumes(&[]).contains("No saved resumes."));
        assert!(render_jobs(&[]).contains("No saved jobs."));
    }
}
