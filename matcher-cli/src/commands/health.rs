//! Health command implementation.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use matcher_core::api::MatcherApi;
use matcher_core::{MatcherError, Operation};
use tracing::info;

use crate::utils::print_json;
use crate::{Output, OutputFormat};

/// Execute the health command.
pub async fn execute(api: Arc<dyn MatcherApi>, output: Output) -> Result<()> {
    let health = api
        .health()
        .await
        .map_err(|e| MatcherError::from_api(Operation::Health, e))?;

    let status = health
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or("unknown");
    info!(status, "Health check completed");

    match output.format {
        OutputFormat::Json => print_json(&health)?,
        OutputFormat::Text if output.quiet => println!("{status}"),
        OutputFormat::Text => {
            println!();
            println!("   {} {}", "Matching service:".dimmed(), status.green().bold());
            if let Some(services) = health.get("services").and_then(|s| s.as_object()) {
                for (name, state) in services {
                    let state = state
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| state.to_string());
                    println!("     {} {}", format!("{name}:").dimmed(), state);
                }
            }
        }
    }

    Ok(())
}
