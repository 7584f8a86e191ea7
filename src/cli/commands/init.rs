//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "veil.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Veil configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Add organization names or project codenames under [domain_specific_terms]");
                println!("  3. Validate configuration: veil validate-config");
                println!("  4. Anonymize text: echo 'Contact jane@x.com' | veil anonymize");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    pub(crate) fn generate_minimal_config() -> String {
        r#"# Veil Configuration File
# Reversible text anonymization

[application]
log_level = "info"

[anonymizer]
case_sensitive_terms = false
save_mappings = true
unknown_placeholder = "leave"

[detection]
entity_model = "heuristic"
confidence_threshold = 0.7

[storage]
backend = "file"
path = "./state"

[audit]
enabled = false

[logging]
local_enabled = false

[domain_specific_terms]
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    pub(crate) fn generate_config_with_examples() -> String {
        r#"# Veil Configuration File
# Reversible text anonymization
#
# This file contains all configuration options with examples and explanations.
# Values may reference environment variables with ${VAR_NAME}, and any
# setting can be overridden with a VEIL_<SECTION>_<KEY> variable.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Anonymizer Settings
# ============================================================================
[anonymizer]
# Match custom terms case-sensitively (ASCII folding when false)
case_sensitive_terms = false

# Persist mappings and terms after every operation that changes them
# (false = only on explicit flush)
save_mappings = true

# What deanonymize does with placeholder-shaped tokens it never issued:
# - leave: keep them verbatim
# - error: fail the call
unknown_placeholder = "leave"

# ============================================================================
# Detection Settings
# ============================================================================
[detection]
# Entity model: "none" or "heuristic"
entity_model = "heuristic"

# Optional: custom pattern library replacing the built-in one
# pattern_library = "patterns/custom.toml"

# Patterns with a lower confidence are skipped (0.0-1.0)
confidence_threshold = 0.7

# Entity labels to drop (after label mapping)
ignored_labels = []

# Rename model labels before they become categories
[detection.label_map]
# PER = "PERSON"
# LOC = "LOCATION"

# ============================================================================
# Storage Settings
# ============================================================================
[storage]
# Backend: "file" (JSON documents) or "memory" (lost on exit)
backend = "file"

# Directory holding mappings.json and terms.json
path = "./state"

# Start empty instead of failing when stored state is corrupt
recover_corrupt_state = false

# ============================================================================
# Audit Settings
# ============================================================================
[audit]
# Append one line per anonymize/deanonymize call (values are hashed)
enabled = false
log_path = "./audit/veil.log"
json_format = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "./logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"

# ============================================================================
# Domain-Specific Terms
# ============================================================================
# Literal terms always treated as sensitive, per category
[domain_specific_terms]
# ORG = ["Acme Corp", "Bank of X"]
# PROJECT = ["Bluebird"]
"#
        .to_string()
    }
}
