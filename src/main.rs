// Veil - Reversible Text Anonymization
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

use veil::cli::{Cli, Commands};
use veil::config::{load_config, LoggingConfig};
use veil::log_error_with_context;
use veil::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Commands report config errors themselves; here it only picks log settings
    let file_config = load_config(&cli.config).ok();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| file_config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "warn".to_string());
    let logging_config = file_config
        .map(|c| c.logging)
        .unwrap_or_else(LoggingConfig::default);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Veil starting");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context!(&e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Anonymize(args) => args.execute(&cli.config).await,
        Commands::Deanonymize(args) => args.execute(&cli.config).await,
        Commands::Analyze(args) => args.execute(&cli.config).await,
        Commands::Terms(args) => args.execute(&cli.config).await,
        Commands::Mappings(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
