//! External system integrations for Veil.
//!
//! - [`storage`] - Persistence backends for mappings and custom terms
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with in-memory implementations.
//!
//! ```rust,no_run
//! use veil::adapters::storage::{JsonFileStorage, StateStorage};
//!
//! # async fn example() -> veil::domain::Result<()> {
//! let storage = JsonFileStorage::new("./state");
//! if let Some(snapshot) = storage.load_mappings().await? {
//!     println!("{} placeholders on record", snapshot.entries.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod storage;
