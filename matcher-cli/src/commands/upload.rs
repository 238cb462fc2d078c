//! Upload command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use matcher_core::api::MatcherApi;
use matcher_core::{FileKind, UploadSession};

use crate::utils::{format_timestamp, load_document, print_json};
use crate::{Output, OutputFormat};

/// Execute the upload command.
pub async fn execute(
    api: Arc<dyn MatcherApi>,
    max_upload_bytes: usize,
    file: PathBuf,
    kind: FileKind,
    output: Output,
) -> Result<()> {
    let document = load_document(&file)?;

    let session = UploadSession::with_limit(kind, max_upload_bytes);
    let uploaded = session
        .submit(&api, &document)
        .await
        .with_context(|| format!("Failed to upload {kind}"))?;

    match output.format {
        OutputFormat::Json => print_json(&uploaded)?,
        OutputFormat::Text if output.quiet => println!("{}", uploaded.file_id),
        OutputFormat::Text => {
            println!();
            println!("{}", format!("Uploaded {kind}").green().bold());
            println!();
            println!("   {} {}", "File:".dimmed(), uploaded.filename);
            println!("   {} {}", "File ID:".dimmed(), uploaded.file_id);
            println!(
                "   {} {}",
                "Uploaded at:".dimmed(),
                format_timestamp(&uploaded.uploaded_at)
            );
            if let Some(text) = &uploaded.extracted_text {
                println!(
                    "   {} {} characters",
                    "Extracted text:".dimmed(),
                    text.chars().count()
                );
            }
        }
    }

    Ok(())
}
