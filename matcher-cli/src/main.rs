//! Matcher CLI - score a resume against a job description.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use matcher_core::api::{HttpMatcherApi, MatcherApi, MockMatcherApi};
use matcher_core::{ClientConfig, FileKind};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  64  Usage error (invalid arguments or configuration)
  65  Validation error (unsupported file, missing upload)
  66  Input file cannot be read
  69  Matching service unavailable or request rejected";

#[derive(Parser)]
#[command(name = "matcher")]
#[command(author, version, about = "Match a resume against a job description", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Base URL of the matching API (overrides MATCHER_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Use the in-memory mock API instead of the remote service
    #[arg(long, global = true)]
    mock: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Suppress decorative output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a resume and a job description, then print the match report
    Analyze {
        /// Path to the resume (PDF or DOCX)
        #[arg(value_name = "RESUME")]
        resume: PathBuf,

        /// Path to the job description (PDF or DOCX)
        #[arg(value_name = "JOB")]
        job: PathBuf,
    },

    /// Upload a single document and print its identifier
    Upload {
        /// Path to the document (PDF or DOCX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Which slot the document fills (resume or job)
        #[arg(short, long, default_value = "resume")]
        kind: FileKind,
    },

    /// Check that the matching service is reachable
    Health,

    /// Drive an upload/analyze session from standard input
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Options shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub format: OutputFormat,
    pub quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return process::ExitCode::from(exit_codes::USAGE_ERROR as u8);
        }
    };

    init_tracing(cli.verbose);

    let exit = match run(cli).await {
        Ok(()) => ExitCode::success(),
        Err(err) => ExitCode::from_anyhow(&err),
    };
    if let Some(message) = &exit.message {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
    process::ExitCode::from(exit.code as u8)
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output {
        format: cli.format,
        quiet: cli.quiet,
    };

    let mut config = ClientConfig::from_env().context("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config = config
            .with_base_url(url)
            .context("Invalid --api-url")?;
    }
    let max_upload_bytes = config.max_upload_bytes;
    let api = build_api(config, cli.mock, output)?;

    match cli.command {
        Commands::Analyze { resume, job } => {
            commands::analyze::execute(api, max_upload_bytes, resume, job, output).await
        }
        Commands::Upload { file, kind } => {
            commands::upload::execute(api, max_upload_bytes, file, kind, output).await
        }
        Commands::Health => commands::health::execute(api, output).await,
        Commands::Interactive => {
            commands::interactive::execute(api, max_upload_bytes, output).await
        }
    }
}

fn build_api(config: ClientConfig, mock: bool, output: Output) -> Result<Arc<dyn MatcherApi>> {
    if mock {
        warn!("Using MOCK matching API (no documents leave this machine)");
        if !output.quiet && output.format == OutputFormat::Text {
            eprintln!("{}", "Using MOCK matching API".yellow());
        }
        return Ok(Arc::new(MockMatcherApi::new()));
    }

    debug!(base_url = %config.base_url, "Using matching service");
    let api = HttpMatcherApi::new(config).context("Failed to create API client")?;
    Ok(Arc::new(api))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
