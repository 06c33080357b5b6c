//! core::semver
//!
//! Semantic version parsing and comparison.
//!
//! # Grammar
//!
//! An optional leading `v`, then `MAJOR[.MINOR[.PATCH]][-PRERELEASE][+BUILD]`.
//! Missing minor and patch components default to zero.
//!
//! # Precedence
//!
//! Core components compare numerically. When they are equal, a release is
//! greater than any pre-release, and two pre-release tags compare as plain
//! ASCII strings. This is not the dot-segment aware ordering of semver 2.0:
//! `1.0.0-beta.11` sorts *before* `1.0.0-beta.2`. Version validators depend on
//! this exact rule. Build metadata never participates in comparison.
//!
//! # Display
//!
//! Formatting reproduces the input without its `v` prefix, including the
//! number of core components written: `2.1` displays as `2.1`, not `2.1.0`.
//!
//! # Example
//!
//! ```
//! use verstamp::core::semver::SemVer;
//!
//! let old: SemVer = "1.2.3".parse().unwrap();
//! let new: SemVer = "v2.0.0".parse().unwrap();
//! assert!(old.less_than(&new));
//! assert_eq!(new.to_string(), "2.0.0");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::errors::{SemVerError, VersionError};

/// A parsed semantic version.
///
/// Equality and ordering ignore build metadata, so `1.0.0+a == 1.0.0+b`.
#[derive(Debug, Clone)]
pub struct SemVer {
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: String,
    build: String,
    /// Number of core components present in the source text (1..=3).
    components: usize,
}

impl SemVer {
    /// Parse a version string.
    ///
    /// # Errors
    ///
    /// Returns [`SemVerError`] if the string is empty, the core has more than
    /// three dot-separated parts, or a core part is not a non-negative integer.
    pub fn parse(input: &str) -> Result<Self, SemVerError> {
        let s = input.strip_prefix('v').unwrap_or(input);
        if s.is_empty() {
            return Err(SemVerError::Empty);
        }

        let (version_part, build) = match s.split_once('+') {
            Some((version, build)) => (version, build),
            None => (s, ""),
        };
        let (core, prerelease) = match version_part.split_once('-') {
            Some((core, pre)) => (core, pre),
            None => (version_part, ""),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return Err(SemVerError::TooManyParts {
                input: input.to_string(),
            });
        }

        let major = parse_component("major", parts[0])?;
        let minor = match parts.get(1) {
            Some(p) => parse_component("minor", p)?,
            None => 0,
        };
        let patch = match parts.get(2) {
            Some(p) => parse_component("patch", p)?,
            None => 0,
        };

        Ok(Self {
            major,
            minor,
            patch,
            prerelease: prerelease.to_string(),
            build: build.to_string(),
            components: parts.len(),
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Pre-release tag, empty when absent.
    pub fn prerelease(&self) -> &str {
        &self.prerelease
    }

    /// Build metadata, empty when absent.
    pub fn build(&self) -> &str {
        &self.build
    }

    /// Compare two versions by precedence.
    pub fn compare(&self, other: &SemVer) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| {
                match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => self.prerelease.as_str().cmp(other.prerelease.as_str()),
                }
            })
    }

    pub fn less_than(&self, other: &SemVer) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn greater_than(&self, other: &SemVer) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub fn equal(&self, other: &SemVer) -> bool {
        self.compare(other) == Ordering::Equal
    }

    pub fn greater_or_equal(&self, other: &SemVer) -> bool {
        self.compare(other) != Ordering::Less
    }

    pub fn less_or_equal(&self, other: &SemVer) -> bool {
        self.compare(other) != Ordering::Greater
    }
}

fn parse_component(name: &'static str, value: &str) -> Result<u64, SemVerError> {
    // u64::from_str accepts a leading '+', which is never a valid component.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SemVerError::InvalidComponent {
            component: name,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| SemVerError::InvalidComponent {
        component: name,
        value: value.to_string(),
    })
}

impl FromStr for SemVer {
    type Err = SemVerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if self.components > 1 {
            write!(f, ".{}", self.minor)?;
        }
        if self.components > 2 {
            write!(f, ".{}", self.patch)?;
        }
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

impl PartialEq for SemVer {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for SemVer {}

impl PartialOrd for SemVer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemVer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

/// Parse two version strings and compare them.
///
/// # Errors
///
/// [`VersionError::InvalidVersionFormat`] wrapping the parse error of
/// whichever side is invalid (left side first).
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionError> {
    let a = SemVer::parse(a)?;
    let b = SemVer::parse(b)?;
    Ok(a.compare(&b))
}

/// Returns true if `candidate` is strictly newer than `current`.
///
/// # Errors
///
/// [`VersionError::InvalidVersionFormat`] if either string is not a valid
/// version.
pub fn is_newer_version(candidate: &str, current: &str) -> Result<bool, VersionError> {
    Ok(compare_versions(candidate, current)? == Ordering::Greater)
}
