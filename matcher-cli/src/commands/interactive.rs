//! Interactive command implementation.
//!
//! A line-oriented front end over one [`MatchOrchestrator`]: each input line
//! is one user action, and the derived screen is rendered after it.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use matcher_core::api::MatcherApi;
use matcher_core::{FileKind, MatchOrchestrator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::utils::{load_document, print_json, print_screen};
use crate::{Output, OutputFormat};

const HELP: &str = "\
Commands:
  resume <PATH>   upload a resume
  job <PATH>      upload a job description
  analyze         match the uploaded documents
  another         start over (alias: reset)
  status          show the current screen
  help            show this help
  quit            leave (alias: exit)";

#[derive(Debug, PartialEq, Eq)]
enum Action<'a> {
    Upload(FileKind, &'a str),
    Analyze,
    Reset,
    Status,
    Help,
    Quit,
    Unknown(&'a str),
}

impl Action<'_> {
    /// Whether the action is offered while the report is showing.
    fn allowed_on_report(&self) -> bool {
        !matches!(self, Self::Upload(..) | Self::Analyze)
    }
}

fn parse_action(line: &str) -> Option<Action<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let action = match word.to_ascii_lowercase().as_str() {
        "resume" | "job" if rest.is_empty() => Action::Unknown(line),
        "resume" => Action::Upload(FileKind::Resume, rest),
        "job" => Action::Upload(FileKind::JobDescription, rest),
        "analyze" => Action::Analyze,
        "reset" | "another" => Action::Reset,
        "status" => Action::Status,
        "help" | "?" => Action::Help,
        "quit" | "exit" => Action::Quit,
        _ => Action::Unknown(line),
    };
    Some(action)
}

/// Execute the interactive command.
pub async fn execute(
    api: Arc<dyn MatcherApi>,
    max_upload_bytes: usize,
    output: Output,
) -> Result<()> {
    let orchestrator = MatchOrchestrator::with_limit(api, max_upload_bytes);
    let text = output.format == OutputFormat::Text;

    if text && !output.quiet {
        println!("{}", "Resume / job description matcher".bold());
        println!("{HELP}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if text && !output.quiet {
            print!("{} ", ">".cyan());
            std::io::stdout().flush().context("Failed to write prompt")?;
        }

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let Some(action) = parse_action(&line) else {
            continue;
        };
        debug!(?action, "Interactive action");

        if !action.allowed_on_report() && orchestrator.screen().is_report() {
            eprintln!(
                "{} a report is showing; type 'another' to start a new match",
                "Error:".red().bold()
            );
            continue;
        }

        match action {
            Action::Upload(kind, path) => match load_document(Path::new(path)) {
                Ok(document) => {
                    // Failures land in the screen's error slot
                    let _ = orchestrator.upload(kind, &document).await;
                }
                Err(err) => {
                    eprintln!("{} {err:#}", "Error:".red().bold());
                    continue;
                }
            },
            Action::Analyze => {
                let _ = orchestrator.analyze().await;
            }
            Action::Reset => orchestrator.reset(),
            Action::Status => {}
            Action::Help => {
                println!("{HELP}");
                continue;
            }
            Action::Quit => break,
            Action::Unknown(input) => {
                eprintln!("{} unknown command '{input}' (try 'help')", "Error:".red().bold());
                continue;
            }
        }

        let screen = orchestrator.screen();
        match output.format {
            OutputFormat::Json => print_json(&screen)?,
            OutputFormat::Text => print_screen(&screen),
        }
    }

    Ok(())
}
