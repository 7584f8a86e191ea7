//! Sensitivity category type
//!
//! Categories are an open set of string tags. Built-in detectors use a few
//! well-known names, and callers may introduce their own at runtime by
//! registering custom terms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category label attached to a sensitive span
///
/// # Examples
///
/// ```
/// use veil::domain::Category;
///
/// let category = Category::new("project names").unwrap();
/// assert_eq!(category.as_str(), "project names");
/// assert_eq!(category.placeholder_prefix(), "PROJECT_NAMES");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Person names
    pub const PERSON: &'static str = "PERSON";
    /// Organizations
    pub const ORG: &'static str = "ORG";
    /// Locations
    pub const LOCATION: &'static str = "LOCATION";
    /// Email addresses
    pub const EMAIL: &'static str = "EMAIL";
    /// Phone numbers
    pub const PHONE: &'static str = "PHONE";

    /// Creates a new category, trimming surrounding whitespace
    ///
    /// # Returns
    ///
    /// Returns `Err` if the name is empty after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err("Category cannot be empty".to_string());
        }
        if trimmed.len() == name.len() {
            Ok(Self(name))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Returns the category as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Prefix used when minting placeholder tokens for this category
    ///
    /// Upper-cases the name and replaces every character that is not an
    /// ASCII letter or digit with `_`.
    pub fn placeholder_prefix(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_valid() {
        let category = Category::new("ORG").unwrap();
        assert_eq!(category.as_str(), "ORG");
        assert_eq!(category.to_string(), "ORG");
    }

    #[test]
    fn test_category_trimmed() {
        let category = Category::new("  PERSON ").unwrap();
        assert_eq!(category.as_str(), "PERSON");
    }

    #[test]
    fn test_category_empty() {
        assert!(Category::new("").is_err());
        assert!(Category::new("   ").is_err());
    }

    #[test]
    fn test_placeholder_prefix() {
        assert_eq!(Category::new("EMAIL").unwrap().placeholder_prefix(), "EMAIL");
        assert_eq!(
            Category::new("ip-address").unwrap().placeholder_prefix(),
            "IP_ADDRESS"
        );
        assert_eq!(
            Category::new("Médical code").unwrap().placeholder_prefix(),
            "M_DICAL_CODE"
        );
    }

    #[test]
    fn test_category_serde_roundtrip() {
        let category = Category::new("ORG").unwrap();
        let json = serde_json::to_string(&category).unwrap();
        assert_eq!(json, "\"ORG\"");

        assert!(serde_json::from_str::<Category>("\"\"").is_err());
    }
}
