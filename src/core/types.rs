//! core::types
//!
//! Strong types for version metadata concepts.
//!
//! # Types
//!
//! - [`Dimension`] - One of the versioned dimensions validators can target
//! - [`CommitHash`] - Validated abbreviated or full git commit hash
//! - [`TreeState`] - Clean or dirty working tree
//! - [`CustomValue`] - Tagged value stored in the `custom` dimension
//!
//! # Validation
//!
//! [`CommitHash`] enforces its format at construction time, so output read
//! from an external `git` process can only enter a snapshot through it.
//!
//! ```
//! use verstamp::core::types::CommitHash;
//!
//! assert!(CommitHash::new("abc1234").is_ok());
//! assert!(CommitHash::new("abc12").is_err());
//! assert!(CommitHash::new("not-a-sha").is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid commit hash: {0}")]
    InvalidCommitHash(String),

    #[error("invalid tree state: {0}")]
    InvalidTreeState(String),
}

/// A dimension that version validators can target.
///
/// The `custom` dimension holds arbitrary values and is not validated by
/// minimum-version checks, so it has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Schema,
    Api,
    Component,
}

impl Dimension {
    /// Name of the dimension as it appears in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Schema => "schema",
            Dimension::Api => "API",
            Dimension::Component => "component",
        }
    }

    /// Manifest key holding this dimension's map.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            Dimension::Schema => "schemas",
            Dimension::Api => "apis",
            Dimension::Component => "components",
        }
    }

    pub(crate) fn not_found_hint(&self) -> &'static str {
        match self {
            Dimension::Schema => {
                "Add the schema to your versions.yaml:\n  schemas:\n    schema_name: \"version\""
            }
            Dimension::Api => "Add the API to your versions.yaml:\n  apis:\n    api_name: \"version\"",
            Dimension::Component => {
                "Add the component to your versions.yaml:\n  components:\n    component_name: \"version\""
            }
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A git commit hash read from an untrusted source.
///
/// Must be 7 to 40 hexadecimal characters. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitHash(String);

impl CommitHash {
    const MIN_LEN: usize = 7;
    const MAX_LEN: usize = 40;

    /// Create a validated commit hash.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommitHash` if the length is outside 7..=40
    /// or any character is not a hex digit.
    pub fn new(hash: impl Into<String>) -> Result<Self, TypeError> {
        let hash = hash.into();
        if !Self::is_valid(&hash) {
            return Err(TypeError::InvalidCommitHash(hash));
        }
        Ok(Self(hash))
    }

    /// Check a candidate without allocating.
    pub fn is_valid(hash: &str) -> bool {
        (Self::MIN_LEN..=Self::MAX_LEN).contains(&hash.len())
            && hash.chars().all(|c| c.is_ascii_hexdigit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of the working tree a binary was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeState {
    #[default]
    Clean,
    Dirty,
}

impl TreeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeState::Clean => "clean",
            TreeState::Dirty => "dirty",
        }
    }
}

impl fmt::Display for TreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreeState {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clean" => Ok(TreeState::Clean),
            "dirty" => Ok(TreeState::Dirty),
            other => Err(TypeError::InvalidTreeState(other.to_string())),
        }
    }
}

/// A value in the free-form `custom` dimension.
///
/// Serialized untagged, so manifests and JSON output carry plain scalars,
/// lists, and mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<CustomValue>),
    Map(BTreeMap<String, CustomValue>),
}

impl CustomValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CustomValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CustomValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CustomValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, CustomValue>> {
        match self {
            CustomValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomValue::Null => f.write_str("null"),
            CustomValue::Bool(b) => write!(f, "{b}"),
            CustomValue::Integer(n) => write!(f, "{n}"),
            CustomValue::Float(x) => write!(f, "{x}"),
            CustomValue::String(s) => f.write_str(s),
            CustomValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            CustomValue::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for CustomValue {
    fn from(s: &str) -> Self {
        CustomValue::String(s.to_string())
    }
}

impl From<String> for CustomValue {
    fn from(s: String) -> Self {
        CustomValue::String(s)
    }
}

impl From<bool> for CustomValue {
    fn from(b: bool) -> Self {
        CustomValue::Bool(b)
    }
}

impl From<i64> for CustomValue {
    fn from(n: i64) -> Self {
        CustomValue::Integer(n)
    }
}
