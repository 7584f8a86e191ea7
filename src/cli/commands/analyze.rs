//! Analyze command implementation
//!
//! This module implements the `analyze` command: report which sensitive
//! values a text contains without registering any placeholder.

use super::{open_service, InputArgs};
use clap::Args;

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeArgs {
    /// Execute the analyze command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let text = self.input.read().await?;
        let report = service.analyze_sensitivity(&text);

        tracing::info!(
            categories = report.len(),
            values = report.total_values(),
            "Sensitivity analysis complete"
        );

        if self.json {
            println!("{}", report.format_json()?);
        } else {
            println!("{}", report.format_console());
        }

        Ok(0)
    }
}
