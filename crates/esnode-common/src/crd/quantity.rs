//! Kubernetes quantity strings ("100m", "4Gi")
//!
//! Quantities are carried verbatim. The only interpretation done here is
//! deciding whether a value is the zero quantity, which is what triggers a
//! fallback to the configured default.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A Kubernetes resource quantity, kept as the original text
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Quantity(String);

impl Quantity {
    /// Wrap a quantity string without validation
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The quantity exactly as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty string or any value whose numeric part is zero.
    ///
    /// Malformed text is not rejected; anything whose numeric part cannot be
    /// read counts as non-zero and is passed through unchanged.
    pub fn is_zero(&self) -> bool {
        let value = self.0.trim();
        if value.is_empty() {
            return true;
        }
        let numeric_end = value
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-')))
            .unwrap_or(value.len());
        match value[..numeric_end].parse::<f64>() {
            Ok(n) => n == 0.0,
            Err(_) => false,
        }
    }

    /// Returns `Some(self)` unless the quantity is zero
    pub fn non_zero(&self) -> Option<&Self> {
        if self.is_zero() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_forms_are_zero() {
        for value in ["", "0", "0Gi", "0m", "0.0", "  0  ", "-0"] {
            assert!(Quantity::from(value).is_zero(), "{value:?} should be zero");
        }
    }

    #[test]
    fn non_zero_forms_are_not_zero() {
        for value in ["100m", "4Gi", "1", "0.5", "8Gi", "512Mi"] {
            assert!(!Quantity::from(value).is_zero(), "{value:?} should be non-zero");
        }
    }

    #[test]
    fn unreadable_text_passes_through_as_non_zero() {
        let q = Quantity::from("lots");
        assert!(!q.is_zero());
        assert_eq!(q.non_zero().map(Quantity::as_str), Some("lots"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let q = Quantity::from("8Gi");
        assert_eq!(serde_json::to_string(&q).expect("serialize"), "\"8Gi\"");
        let back: Quantity = serde_json::from_str("\"250m\"").expect("deserialize");
        assert_eq!(back.as_str(), "250m");
    }
}
