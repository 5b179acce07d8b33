//! Results view rendered for the terminal.

use std::fmt::Write;

use colored::{Color, Colorize};

use crate::models::analysis::AnalysisResult;

const GAUGE_WIDTH: usize = 30;
const RULE_WIDTH: usize = 64;

/// Gauge colour: green from 80, yellow from 50, red below.
pub fn score_color(score: i64) -> Color {
    if score >= 80 {
        Color::Green
    } else if score >= 50 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Filled cells for a score; out-of-range scores are drawn at the bounds.
fn gauge_cells(score: i64) -> usize {
    let clamped = score.clamp(0, 100) as usize;
    (clamped * GAUGE_WIDTH + 50) / 100
}

pub fn render_gauge(score: i64) -> String {
    let filled = gauge_cells(score);
    format!(
        "{}{} {}",
        "█".repeat(filled).color(score_color(score)),
        "░".repeat(GAUGE_WIDTH - filled).dimmed(),
        format!("{score}% Match").bold()
    )
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", title.bold());
    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH).dimmed());
}

pub fn render_dashboard(result: &AnalysisResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} {}", "🏢".dimmed(), result.company_name.cyan().bold());
    let _ = writeln!(out, "{}", render_gauge(result.score));

    section(&mut out, "Quick Take");
    for (i, item) in result.quick_take.iter().enumerate() {
        let _ = writeln!(out, "  {} {}", format!("{:02}", i + 1).blue().bold(), item);
    }

    section(&mut out, "Pitch Highlights");
    for item in &result.pitch_highlights {
        let _ = writeln!(out, "  {} {}", "→".blue(), item);
    }

    section(&mut out, "Strengths");
    if result.strengths.is_empty() {
        let _ = writeln!(out, "  {}", "None identified.".dimmed());
    }
    for item in &result.strengths {
        let _ = writeln!(out, "  {} {}", "✓".green(), item);
    }

    section(&mut out, "Gaps");
    if result.missing_skills.is_empty() {
        let _ = writeln!(out, "  {}", "No critical gaps found.".dimmed());
    }
    for item in &result.missing_skills {
        let _ = writeln!(out, "  {} {}", "✗".red(), item);
    }

    section(&mut out, "Hiring Manager Outreach");
    for line in result.sample_email.lines() {
        let _ = writeln!(out, "  {} {}", "│".dimmed(), line);
    }

    if let Some(sources) = result.grounding_sources.as_ref().filter(|s| !s.is_empty()) {
        section(&mut out, "Sources");
        for source in sources {
            let _ = writeln!(out, "  • {} {}", source.title, source.uri.underline().dimmed());
        }
    }

    out
}

/// Single-line error banner for the input view.
pub fn render_error(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message.red())
}
