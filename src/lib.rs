// Veil - Reversible Text Anonymization
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - Reversible Text Anonymization
//!
//! Veil replaces sensitive spans in free text (names, organizations,
//! e-mail addresses, phone numbers, operator-registered terms) with stable
//! placeholder tokens such as `[PERSON_1]`, and restores the originals later.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** sensitive spans with an entity model, regex patterns and
//!   custom literal terms
//! - **Anonymizing** text with placeholders that stay stable across calls
//! - **Deanonymizing** placeholder-bearing text, such as a downstream model's reply
//! - **Persisting** the value/placeholder mapping between runs
//!
//! ## Architecture
//!
//! Veil follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The anonymizer service and state management
//! - [`anonymization`] - Detection, overlap resolution, mapping store, engine
//! - [`adapters`] - State storage backends
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//! use veil::core::AnonymizerService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config("veil.toml")?;
//!     let service = AnonymizerService::new(config).await?;
//!
//!     let outcome = service.anonymize("Contact Dr. Jane Doe at jane@x.com").await?;
//!     println!("{}", outcome.anonymized_text);
//!
//!     let reply = "I have written to [EMAIL_1].";
//!     println!("{}", service.deanonymize(reply)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Placeholders
//!
//! A placeholder is `[PREFIX_N]`: the category upper-cased with
//! non-alphanumeric characters replaced by `_`, and a per-prefix sequence
//! number starting at 1. The same original value always maps to the same
//! placeholder for the lifetime of the mapping store, including across
//! restarts when persistence is enabled.
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], an alias over
//! [`domain::VeilError`]. Detection never fails: an unavailable entity
//! model degrades to zero entity spans with a warning.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
