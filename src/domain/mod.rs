//! Domain types for Veil.
//!
//! The domain layer provides:
//! - **Categories** ([`Category`]): open-ended string labels for sensitive data
//! - **Error types** ([`VeilError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, VeilError>`]:
//!
//! ```rust,no_run
//! use veil::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = veil::config::load_config("veil.toml")?;
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod errors;
pub mod result;

pub use category::Category;
pub use errors::VeilError;
pub use result::Result;
