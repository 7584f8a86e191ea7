//! Placeholder token format
//!
//! Tokens look like `[PREFIX_N]`: the category's placeholder prefix, an
//! underscore and a positive decimal number, wrapped in square brackets.
//! The format is part of the persisted-state contract since deanonymization
//! recognizes tokens syntactically.

use crate::domain::Category;
use regex::Regex;
use std::sync::OnceLock;

/// Regex source matching any placeholder-shaped token
pub const PLACEHOLDER_PATTERN: &str = r"\[([A-Z0-9_]+)_([0-9]+)\]";

/// Compiled placeholder regex
pub fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).expect("static placeholder regex"))
}

/// Render a token for a prefix and sequence number
pub fn format_placeholder(prefix: &str, number: u64) -> String {
    format!("[{prefix}_{number}]")
}

/// Render the token for a category and sequence number
pub fn placeholder_for(category: &Category, number: u64) -> String {
    format_placeholder(&category.placeholder_prefix(), number)
}

/// Split a token into its prefix and number
///
/// Returns `None` unless the whole input is a single well-formed token.
pub fn parse_placeholder(token: &str) -> Option<(&str, u64)> {
    let caps = placeholder_regex().captures(token)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != token.len() {
        return None;
    }
    let prefix = caps.get(1)?.as_str();
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some((prefix, number))
}
