//! State storage layer
//!
//! This module provides a trait-based abstraction for persisting the
//! mapping store and term registry, with a JSON file backend and an
//! in-memory backend.

pub mod factory;
pub mod file;
pub mod memory;
pub mod traits;

pub use factory::create_state_storage;
pub use file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use traits::StateStorage;
