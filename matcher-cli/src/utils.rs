//! Common utility functions shared across CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use matcher_core::{Document, ReportView, Screen, ScoreBand, SlotView, UploadScreen};
use serde::Serialize;
use tracing::info;

/// Read a document from disk.
pub fn load_document(path: &Path) -> Result<Document> {
    let document = Document::from_path(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    info!(path = %path.display(), bytes = document.len(), "Read file");
    Ok(document)
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Format a timestamp as a human-readable UTC string.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn band_colored(band: ScoreBand, text: &str) -> ColoredString {
    match band {
        ScoreBand::Strong => text.green().bold(),
        ScoreBand::Moderate => text.yellow().bold(),
        ScoreBand::Weak => text.red().bold(),
    }
}

fn check(flag: bool) -> ColoredString {
    if flag {
        "yes".green()
    } else {
        "no".red()
    }
}

/// Render the report card.
pub fn print_report(report: &ReportView) {
    println!();
    println!(
        "   {} {}",
        band_colored(report.band, &report.score_label()),
        format!("({} match)", report.band).dimmed()
    );
    println!();
    println!("   {} {}", "Similarity:".dimmed(), report.similarity_label());
    println!("   {} {}", "Skills matched:".dimmed(), report.skills_label());
    println!("   {} {}", "Experience match:".dimmed(), check(report.experience_match));
    println!("   {} {}", "Education match:".dimmed(), check(report.education_match));

    println!();
    println!("   {} ({})", "Matched skills".bold(), report.matched_count);
    for skill in report.matched_skills.lines() {
        if report.matched_skills.is_placeholder() {
            println!("     {}", skill.dimmed());
        } else {
            println!("     {} {}", "+".green(), skill);
        }
    }

    println!();
    println!("   {} ({})", "Gap areas".bold(), report.missing_count);
    for skill in report.missing_skills.lines() {
        if report.missing_skills.is_placeholder() {
            println!("     {}", skill.green());
        } else {
            println!("     {} {}", "-".red(), skill);
        }
    }

    if !report.explanation.is_empty() {
        println!();
        println!("   {}", "Analysis".bold());
        for line in report.explanation.lines() {
            println!("     {line}");
        }
    }

    if !report.recommendations.is_empty() {
        println!();
        println!("   {}", "Recommendations".bold());
        for recommendation in &report.recommendations {
            println!("     * {recommendation}");
        }
    }

    println!();
    println!(
        "   {} {}",
        "Computed at:".dimmed(),
        format_timestamp(&report.computed_at)
    );
}

fn slot_line(label: &str, slot: &SlotView) -> String {
    let status = match slot {
        SlotView::Empty => "not uploaded".dimmed().to_string(),
        SlotView::Uploading => "uploading...".yellow().to_string(),
        SlotView::Uploaded { filename, file_id } => {
            format!("{} {}", filename.green(), format!("[{file_id}]").dimmed())
        }
        SlotView::Failed { message } => message.red().to_string(),
    };
    format!("   {} {}", format!("{:<18}", format!("{label}:")).dimmed(), status)
}

fn print_upload_screen(screen: &UploadScreen) {
    println!("{}", slot_line("Resume", &screen.resume));
    println!("{}", slot_line("Job description", &screen.job));
    let analyze = if screen.analyzing {
        "analyzing...".yellow()
    } else if screen.analyze_enabled {
        "ready".green()
    } else {
        "waiting for both uploads".dimmed()
    };
    println!("   {} {}", format!("{:<18}", "Analyze:").dimmed(), analyze);
    if let Some(error) = &screen.error {
        println!("   {} {}", "Error:".red().bold(), error);
    }
}

/// Render whichever screen the session is on.
pub fn print_screen(screen: &Screen) {
    match screen {
        Screen::Upload(upload) => print_upload_screen(upload),
        Screen::Report(report) => print_report(report),
    }
}
