//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Veil configuration file.

use crate::anonymization::detector::patterns::PatternRegistry;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let patterns = match config.detection.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        };
        let pattern_count = match patterns {
            Ok(registry) => registry.all_patterns().len(),
            Err(e) => {
                println!("❌ Pattern library is invalid");
                println!("   Error: {e:#}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Entity Model: {:?}", config.detection.entity_model);
        println!(
            "  Pattern Library: {} ({pattern_count} patterns)",
            config
                .detection
                .pattern_library
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        );
        println!(
            "  Confidence Threshold: {}",
            config.detection.confidence_threshold
        );
        println!(
            "  Case-Sensitive Terms: {}",
            config.anonymizer.case_sensitive_terms
        );
        println!("  Save Mappings: {}", config.anonymizer.save_mappings);
        println!(
            "  Unknown Placeholders: {:?}",
            config.anonymizer.unknown_placeholder
        );
        println!(
            "  Storage: {:?} ({})",
            config.storage.backend,
            config.storage.path.display()
        );
        println!("  Audit: {}", config.audit.enabled);
        println!(
            "  Configured Terms: {}",
            config
                .domain_specific_terms
                .values()
                .map(Vec::len)
                .sum::<usize>()
        );
        println!();
        Ok(0)
    }
}
