//! Basic node filtering.

use crate::types::Attrs;
use serde_json::Value;

/// Attribute filter with builder-style setters.
///
/// All conditions must hold for a node to match. This is deliberately the
/// whole query surface: key equality, key presence, and a name substring.
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    equals: Vec<(String, String)>,
    has: Vec<String>,
    name_contains: Option<String>,
}

impl NodeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to equal `value` (compared textually).
    pub fn eq(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.equals.push((key.into(), value.into()));
        self
    }

    /// Require `key` to be present, with any value.
    pub fn has(mut self, key: impl Into<String>) -> Self {
        self.has.push(key.into());
        self
    }

    /// Require the `name` attribute to contain `needle`.
    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// True when no conditions have been set.
    pub fn is_empty(&self) -> bool {
        self.equals.is_empty() && self.has.is_empty() && self.name_contains.is_none()
    }

    /// Check an attribute map against every condition.
    pub fn matches(&self, attrs: &Attrs) -> bool {
        for (key, expected) in &self.equals {
            let found = match attrs.get(key) {
                Some(Value::String(s)) => s == expected,
                Some(other) => other.to_string() == *expected,
                None => false,
            };
            if !found {
                return false;
            }
        }
        for key in &self.has {
            if !attrs.contains_key(key) {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            let name = attrs.get("name").and_then(Value::as_str).unwrap_or("");
            if !name.contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}
