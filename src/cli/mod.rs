//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Veil using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Veil - reversible text anonymization
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(version, about, long_about = None)]
#[command(author = "Veil Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "veil.toml", env = "VEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace sensitive values with placeholders
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Restore original values from placeholders
    Deanonymize(commands::deanonymize::DeanonymizeArgs),

    /// Report sensitive values without registering placeholders
    Analyze(commands::analyze::AnalyzeArgs),

    /// Manage custom domain-specific terms
    Terms(commands::terms::TermsArgs),

    /// Show issued placeholders per category
    Mappings(commands::mappings::MappingsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
