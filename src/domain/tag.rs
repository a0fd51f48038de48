//! Tag name validation and per-tag display metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated tag name.
///
/// Tag names are exact, case-sensitive keys into the registry: `Work` and
/// `work` are distinct tags. Surrounding whitespace is trimmed; the result
/// must be non-empty.
///
/// # Examples
///
/// ```
/// use nook::domain::TagName;
///
/// let tag = TagName::new("  work  ").unwrap();
/// assert_eq!(tag.as_str(), "work");
/// assert!(TagName::new("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

/// Error returned when parsing an invalid tag name.
#[derive(Debug, Clone)]
pub struct ParseTagError(String);

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseTagError {}

impl TagName {
    /// Creates a tag name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagError` if the name is empty or whitespace-only.
    pub fn new(s: &str) -> Result<Self, ParseTagError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseTagError("tag name cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagName(\"{}\")", self.0)
    }
}

impl FromStr for TagName {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for TagName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TagName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Display metadata for a tag: an RGB hex color and an icon reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub color: String,
    pub icon: String,
}

impl TagInfo {
    pub fn new(color: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            icon: icon.into(),
        }
    }
}

impl Default for TagInfo {
    fn default() -> Self {
        Self::new("#CCCCCC", "tag.png")
    }
}
