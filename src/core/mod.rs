//! Core orchestration for Veil.
//!
//! # Modules
//!
//! - [`service`] - The anonymizer service: engine plus persistence
//! - [`state`] - Loading and saving mappings and custom terms
//!
//! # Example
//!
//! ```rust,no_run
//! use veil::config::load_config;
//! use veil::core::service::AnonymizerService;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = load_config("veil.toml")?;
//! let service = AnonymizerService::new(config).await?;
//!
//! let outcome = service.anonymize("Contact jane@x.com").await?;
//! println!("{}", outcome.anonymized_text);
//! println!("{}", outcome.formatted_report);
//! # Ok(())
//! # }
//! ```

pub mod service;
pub mod state;

pub use service::AnonymizerService;
