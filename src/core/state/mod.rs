// State management and persistence

pub mod manager;

pub use manager::{LoadSummary, StateManager};
