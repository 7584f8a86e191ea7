//! Audit logging module
//!
//! Provides an append-only record of anonymize and deanonymize calls.
//! Original values are only ever written as SHA-256 hashes.

pub mod logger;

pub use logger::{hash_value, AuditLogger, AuditOperation};
