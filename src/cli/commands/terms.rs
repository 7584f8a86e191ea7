//! Terms command implementation
//!
//! This module implements the `terms` command for managing custom
//! domain-specific terms.

use super::open_service;
use crate::domain::VeilError;
use clap::{Args, Subcommand};
use std::collections::BTreeMap;

/// Arguments for the terms command
#[derive(Args, Debug)]
pub struct TermsArgs {
    #[command(subcommand)]
    pub action: TermsAction,
}

/// Term registry actions
#[derive(Subcommand, Debug)]
pub enum TermsAction {
    /// Register terms under a category
    Add {
        /// Category the terms belong to (e.g. ORG, PROJECT)
        category: String,

        /// Terms to register
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// List registered terms
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl TermsArgs {
    /// Execute the terms command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let service = match open_service(config_path).await {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        match &self.action {
            TermsAction::Add { category, terms } => {
                match service.add_domain_specific_terms(category, terms).await {
                    Ok(added) => {
                        println!("✅ Added {added} new term(s) to {category}");
                        Ok(0)
                    }
                    Err(e @ (VeilError::InvalidCategory(_) | VeilError::InvalidTerm(_))) => {
                        eprintln!("❌ Invalid input");
                        eprintln!("   Error: {e}");
                        Ok(2)
                    }
                    Err(e) => {
                        eprintln!("❌ Failed to add terms");
                        eprintln!("   Error: {e}");
                        Ok(5)
                    }
                }
            }
            TermsAction::List { json } => {
                let terms: BTreeMap<String, Vec<String>> = service
                    .list_terms()
                    .into_iter()
                    .map(|(category, terms)| (category.into_inner(), terms))
                    .collect();

                if *json {
                    println!("{}", serde_json::to_string_pretty(&terms)?);
                } else if terms.is_empty() {
                    println!("No custom terms registered.");
                    println!("Run 'veil terms add <CATEGORY> <TERM>...' to add some.");
                } else {
                    for (category, values) in &terms {
                        println!("{category} ({}):", values.len());
                        for value in values {
                            println!("  - {value}");
                        }
                    }
                }
                Ok(0)
            }
        }
    }
}
