//! Value/placeholder mapping
//!
//! Reversibility depends entirely on this module: [`MappingStore`] holds the
//! bijection and [`placeholder`] defines the token syntax.

pub mod placeholder;
pub mod store;

pub use placeholder::{format_placeholder, parse_placeholder, placeholder_regex};
pub use store::{MappingSnapshot, MappingStore, PlaceholderEntry};
