//! Mappings command implementation
//!
//! This module implements the `mappings` command for displaying the issued
//! placeholders grouped by category.

use super::open_service;
use clap::Args;
use std::collections::BTreeMap;

/// Arguments for the mappings command
#[derive(Args, Debug)]
pub struct MappingsArgs {
    /// Filter by category
    #[arg(long)]
    pub category: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl MappingsArgs {
    /// Execute the mappings command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let mapping: BTreeMap<String, _> = service
            .placeholder_mapping()
            .into_iter()
            .map(|(category, items)| (category.into_inner(), items))
            .filter(|(category, _)| {
                self.category
                    .as_deref()
                    .map_or(true, |wanted| category.eq_ignore_ascii_case(wanted))
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&mapping)?);
            return Ok(0);
        }

        if mapping.is_empty() {
            println!("No placeholders issued yet.");
            println!("Run 'veil anonymize' to start anonymizing text.");
            return Ok(0);
        }

        println!("🔐 Placeholder Mappings");
        println!();
        for (category, items) in &mapping {
            println!("{category} ({}):", items.len());
            for item in items {
                println!("  {} → {}", item.placeholder, item.original_value);
            }
        }

        Ok(0)
    }
}
