//! CLI command implementations
//!
//! This module contains all CLI command implementations and the input and
//! service helpers they share. Commands that produce text write it to stdout
//! and send diagnostics to stderr.

pub mod analyze;
pub mod anonymize;
pub mod deanonymize;
pub mod init;
pub mod mappings;
pub mod terms;
pub mod validate;

use crate::config::load_config;
use crate::core::AnonymizerService;
use anyhow::Context;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Where a command reads its text from
#[derive(Args, Debug, Default, Clone)]
pub struct InputArgs {
    /// Text to process (reads stdin when neither --text nor --input is given)
    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    /// File to read the text from
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

impl InputArgs {
    /// Read the input text
    pub async fn read(&self) -> anyhow::Result<String> {
        if let Some(ref text) = self.text {
            return Ok(text.clone());
        }

        if let Some(ref path) = self.input {
            return tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read input file: {}", path.display()));
        }

        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read stdin")?;
        Ok(text)
    }

    /// Whether the text came from a stream that carries its own line endings
    fn is_stream(&self) -> bool {
        self.text.is_none()
    }
}

/// Write command output to stdout
///
/// Stream input is echoed byte-for-byte; `--text` input gets a newline.
pub(crate) fn write_output(input: &InputArgs, output: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if input.is_stream() {
        stdout.write_all(output.as_bytes())?;
    } else {
        writeln!(stdout, "{output}")?;
    }
    stdout.flush()?;
    Ok(())
}

/// Load configuration and start the anonymizer service
///
/// On failure the error is reported on stderr and the exit code returned:
/// 2 for configuration errors, 5 for everything else.
pub(crate) async fn open_service(config_path: &str) -> Result<AnonymizerService, i32> {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to load configuration file");
            eprintln!("   Error: {e}");
            return Err(2);
        }
    };

    match AnonymizerService::new(config).await {
        Ok(service) => Ok(service),
        Err(e) => {
            tracing::error!(error = %e, "Failed to start anonymizer");
            eprintln!("❌ Failed to start anonymizer");
            eprintln!("   Error: {e:#}");
            Err(5)
        }
    }
}
