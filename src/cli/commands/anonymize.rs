//! Anonymize command implementation
//!
//! This module implements the `anonymize` command: replace sensitive values
//! in text with stable placeholders and persist any new mappings.

use super::{open_service, write_output, InputArgs};
use clap::Args;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the full result (text, report, counts) as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the formatted sensitivity report to stderr
    #[arg(long)]
    pub report: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let text = self.input.read().await?;

        let outcome = match service.anonymize(&text).await {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("❌ Failed to save mappings");
                eprintln!("   Error: {e}");
                return Ok(5);
            }
        };

        tracing::info!(
            replacements = outcome.replacements,
            new_placeholders = outcome.new_placeholders,
            processing_time_ms = outcome.processing_time_ms,
            "Anonymization complete"
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            write_output(&self.input, &outcome.anonymized_text)?;
        }

        if self.report {
            eprintln!("{}", outcome.formatted_report);
        }

        Ok(0)
    }
}
