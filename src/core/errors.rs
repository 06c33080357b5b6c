//! core::errors
//!
//! Error taxonomy for loading, validating, and publishing version metadata.
//!
//! # Kinds
//!
//! - [`VersionError::ManifestNotFound`]: no manifest source; recoverable through
//!   defaults unless strict mode is on
//! - [`VersionError::ManifestRead`]: the file exists but could not be read
//! - [`VersionError::ManifestParse`]: malformed manifest text, always fatal
//! - [`VersionError::InvalidManifest`]: a required project field is empty
//! - [`VersionError::ValidationFailed`]: a validator rejected the snapshot
//! - [`VersionError::AlreadyInitialized`]: the singleton was committed twice
//! - [`VersionError::NotInitialized`]: read after a recorded init failure
//! - [`VersionError::InvalidVersionFormat`]: a string is not a semantic version
//! - [`VersionError::Panicked`]: a validator or git probe panicked mid-pipeline
//!
//! Errors are `Clone` because a failed singleton initialization is stored once
//! and handed to every later reader.
//!
//! # Example
//!
//! ```
//! use verstamp::core::errors::{ErrorKind, VersionError};
//!
//! let err = VersionError::InvalidManifest { field: "project.name" };
//! assert_eq!(err.kind(), ErrorKind::InvalidManifest);
//! assert!(err.hint().unwrap().contains("name:"));
//! ```

use thiserror::Error;

use crate::core::types::Dimension;

/// Errors from parsing a semantic version string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemVerError {
    #[error("empty version string")]
    Empty,

    #[error("invalid version format: {input}")]
    TooManyParts { input: String },

    #[error("invalid {component} version: {value:?}")]
    InvalidComponent {
        component: &'static str,
        value: String,
    },
}

/// A rejection produced by a single validator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The requested item is missing from its dimension.
    #[error("{dimension} '{item}' not found in manifest")]
    NotFound { dimension: Dimension, item: String },

    /// The manifest carries a version for the item that is not a semantic version.
    #[error("invalid {dimension} version '{value}' for '{item}': {source}")]
    InvalidActualVersion {
        dimension: Dimension,
        item: String,
        value: String,
        source: SemVerError,
    },

    /// The validator was configured with a minimum that is not a semantic version.
    #[error("invalid minimum version '{value}' for {dimension} validator '{item}': {source}")]
    InvalidMinimumVersion {
        dimension: Dimension,
        item: String,
        value: String,
        source: SemVerError,
    },

    /// The item's version is below the required minimum.
    #[error("{dimension} '{item}' version {actual} is less than required minimum {minimum}")]
    TooOld {
        dimension: Dimension,
        item: String,
        actual: String,
        minimum: String,
    },

    /// A caller-supplied validator rejected the snapshot.
    #[error("{validator}: {message}")]
    Custom { validator: String, message: String },
}

impl ValidationError {
    /// Create a rejection for a caller-supplied validator.
    pub fn custom(validator: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::Custom {
            validator: validator.into(),
            message: message.into(),
        }
    }

    /// The dimension this rejection concerns, if any.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            ValidationError::NotFound { dimension, .. }
            | ValidationError::InvalidActualVersion { dimension, .. }
            | ValidationError::InvalidMinimumVersion { dimension, .. }
            | ValidationError::TooOld { dimension, .. } => Some(*dimension),
            ValidationError::Custom { .. } => None,
        }
    }

    /// The item this rejection concerns, if any.
    pub fn item(&self) -> Option<&str> {
        match self {
            ValidationError::NotFound { item, .. }
            | ValidationError::InvalidActualVersion { item, .. }
            | ValidationError::InvalidMinimumVersion { item, .. }
            | ValidationError::TooOld { item, .. } => Some(item),
            ValidationError::Custom { .. } => None,
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            ValidationError::NotFound { dimension, .. } => dimension.not_found_hint(),
            ValidationError::InvalidActualVersion { .. } => {
                "Use a semantic version such as \"1.2.3\" or a plain integer such as \"45\""
            }
            ValidationError::InvalidMinimumVersion { .. } => {
                "Pass a semantic version as the validator minimum"
            }
            ValidationError::TooOld { .. } => {
                "Update the version in your manifest to meet the minimum requirement"
            }
            ValidationError::Custom { .. } => "See the validator message for details",
        }
    }
}

/// Stable classification of a [`VersionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ManifestNotFound,
    ManifestRead,
    ManifestParse,
    InvalidManifest,
    ValidationFailed,
    AlreadyInitialized,
    NotInitialized,
    InvalidVersionFormat,
    Panicked,
}

impl ErrorKind {
    /// Machine-readable code for the kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ManifestNotFound => "MANIFEST_NOT_FOUND",
            ErrorKind::ManifestRead => "LOAD_MANIFEST_FAILED",
            ErrorKind::ManifestParse => "MANIFEST_PARSE_FAILED",
            ErrorKind::InvalidManifest => "INVALID_MANIFEST_FORMAT",
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
            ErrorKind::AlreadyInitialized => "MULTIPLE_INITIALIZE",
            ErrorKind::NotInitialized => "NOT_INITIALIZED",
            ErrorKind::InvalidVersionFormat => "INVALID_VERSION_FORMAT",
            ErrorKind::Panicked => "INITIALIZE_PANICKED",
        }
    }
}

/// Errors from the load, enrich, validate, and publish pipeline.
#[derive(Debug, Error, Clone)]
pub enum VersionError {
    /// No manifest source was available.
    #[error("version manifest not found: {location}")]
    ManifestNotFound {
        /// The path looked up, or a description of the missing source
        location: String,
        /// Whether strict mode turned this into a fatal error
        strict: bool,
    },

    /// The manifest file exists but could not be read.
    #[error("failed to read version manifest '{path}': {message}")]
    ManifestRead { path: String, message: String },

    /// The manifest text is malformed.
    #[error("failed to parse version manifest from {origin}: {message}")]
    ManifestParse { origin: String, message: String },

    /// The manifest parsed but a required project field is empty.
    #[error("invalid manifest format: {field} is required")]
    InvalidManifest { field: &'static str },

    /// A validator rejected the enriched snapshot.
    #[error("version validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// The singleton has already left its uninitialized state.
    #[error("version singleton already initialized (initialization happens exactly once per process)")]
    AlreadyInitialized,

    /// The singleton failed to initialize; carries the recorded failure.
    #[error("version not initialized: {cause}")]
    NotInitialized { cause: Box<VersionError> },

    /// A version string is not a semantic version.
    #[error("invalid version format: {0}")]
    InvalidVersionFormat(#[from] SemVerError),

    /// Code running inside the pipeline panicked. Stored like any other
    /// failure so the pipeline is never re-run.
    #[error("version pipeline panicked: {message}")]
    Panicked { message: String },
}

impl VersionError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VersionError::ManifestNotFound { .. } => ErrorKind::ManifestNotFound,
            VersionError::ManifestRead { .. } => ErrorKind::ManifestRead,
            VersionError::ManifestParse { .. } => ErrorKind::ManifestParse,
            VersionError::InvalidManifest { .. } => ErrorKind::InvalidManifest,
            VersionError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            VersionError::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            VersionError::NotInitialized { .. } => ErrorKind::NotInitialized,
            VersionError::InvalidVersionFormat(_) => ErrorKind::InvalidVersionFormat,
            VersionError::Panicked { .. } => ErrorKind::Panicked,
        }
    }

    /// Actionable remediation for this error.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            VersionError::ManifestNotFound { strict: true, .. } => Some(
                "Either create the required manifest file or disable strict mode",
            ),
            VersionError::ManifestNotFound { strict: false, .. } => Some(
                "Create a versions.yaml file or embed the manifest with LoadOptions::with_embedded",
            ),
            VersionError::ManifestRead { .. } => {
                Some("Check that the manifest file is readable by this process")
            }
            VersionError::ManifestParse { .. } => Some(
                "Check the manifest syntax, for example with: yamllint versions.yaml",
            ),
            VersionError::InvalidManifest { field: "project.name" } => Some(
                "Add the project name to your manifest:\n  project:\n    name: \"your-app-name\"\n    version: \"1.0.0\"",
            ),
            VersionError::InvalidManifest { .. } => Some(
                "Add the project version to your manifest:\n  project:\n    name: \"your-app-name\"\n    version: \"1.0.0\"",
            ),
            VersionError::ValidationFailed(err) => Some(err.hint()),
            VersionError::AlreadyInitialized => Some(
                "The singleton can only be initialized once. Options:\n  \
                 1. Call initialize() at startup before any get()/must_get() calls\n  \
                 2. Use get() to read the already-initialized instance\n  \
                 3. Use new_info() to build an independent, non-singleton instance\n  \
                 4. In tests only: call reset() before re-initializing",
            ),
            VersionError::NotInitialized { cause } => cause.hint(),
            VersionError::InvalidVersionFormat(_) => {
                Some("Use MAJOR[.MINOR[.PATCH]][-PRERELEASE][+BUILD], e.g. \"1.2.3\"")
            }
            VersionError::Panicked { .. } => Some(
                "A custom validator or git probe panicked; return an error from it instead",
            ),
        }
    }

    /// Check whether the pipeline can continue with defaults after this error.
    ///
    /// Only a missing manifest outside strict mode is recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VersionError::ManifestNotFound { strict: false, .. })
    }

    /// The validator rejection wrapped by this error, if any.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            VersionError::ValidationFailed(err) => Some(err),
            VersionError::NotInitialized { cause } => cause.validation(),
            _ => None,
        }
    }
}
