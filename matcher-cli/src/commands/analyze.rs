//! Analyze command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use matcher_core::api::MatcherApi;
use matcher_core::{MatchOrchestrator, ReportView};
use serde_json::json;
use tracing::info;

use crate::utils::{load_document, print_json, print_report};
use crate::{Output, OutputFormat};

/// Execute the analyze command.
pub async fn execute(
    api: Arc<dyn MatcherApi>,
    max_upload_bytes: usize,
    resume: PathBuf,
    job: PathBuf,
    output: Output,
) -> Result<()> {
    // Read both documents before anything goes over the wire
    let resume_doc = load_document(&resume)?;
    let job_doc = load_document(&job)?;

    let orchestrator = MatchOrchestrator::with_limit(api, max_upload_bytes);

    let (resume_result, job_result) = orchestrator.upload_both(&resume_doc, &job_doc).await;
    let resume_file = resume_result.context("Resume upload failed")?;
    let job_file = job_result.context("Job description upload failed")?;
    info!(
        resume_id = %resume_file.file_id,
        job_id = %job_file.file_id,
        "Both documents uploaded"
    );

    if output.format == OutputFormat::Text && !output.quiet {
        println!(
            "{} {} {}",
            "Uploaded resume:".dimmed(),
            resume_file.filename,
            format!("[{}]", resume_file.file_id).dimmed()
        );
        println!(
            "{} {} {}",
            "Uploaded job description:".dimmed(),
            job_file.filename,
            format!("[{}]", job_file.file_id).dimmed()
        );
    }

    let response = orchestrator.analyze().await.context("Analysis failed")?;
    let report = ReportView::from_response(&response);

    match output.format {
        OutputFormat::Json => print_json(&json!({
            "resume": resume_file,
            "job_description": job_file,
            "report": report,
        }))?,
        OutputFormat::Text if output.quiet => {
            println!("{} {}", report.score_label(), report.band);
        }
        OutputFormat::Text => print_report(&report),
    }

    Ok(())
}
