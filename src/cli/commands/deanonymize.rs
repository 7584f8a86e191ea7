//! Deanonymize command implementation
//!
//! This module implements the `deanonymize` command: restore original values
//! for every placeholder the mapping store issued.

use super::{open_service, write_output, InputArgs};
use crate::domain::VeilError;
use clap::Args;

/// Arguments for the deanonymize command
#[derive(Args, Debug)]
pub struct DeanonymizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Fail on placeholders that were never issued instead of leaving them
    #[arg(long)]
    pub strict: bool,
}

impl DeanonymizeArgs {
    /// Execute the deanonymize command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let text = self.input.read().await?;

        let result = if self.strict {
            service.deanonymize_strict(&text)
        } else {
            service.deanonymize(&text)
        };

        match result {
            Ok(restored) => {
                write_output(&self.input, &restored)?;
                Ok(0)
            }
            Err(VeilError::UnknownPlaceholder(token)) => {
                eprintln!("❌ Unknown placeholder: {token}");
                eprintln!("   It was not issued by the mapping store in use");
                Ok(3)
            }
            Err(e) => {
                eprintln!("❌ Deanonymization failed");
                eprintln!("   Error: {e}");
                Ok(5)
            }
        }
    }
}
