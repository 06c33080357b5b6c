//! loader
//!
//! Locates and parses the version manifest.
//!
//! # Source precedence
//!
//! 1. Non-empty embedded bytes, parsed as YAML
//! 2. The configured manifest file, with format chosen by extension
//! 3. Nothing: [`VersionError::ManifestNotFound`]
//!
//! # Fallback policy
//!
//! [`resolve_manifest`] replaces a missing manifest with
//! [`Manifest::fallback`] unless strict mode is on. A file that exists but
//! cannot be read or parsed is always an error, as is a manifest with an
//! empty project name or version.

use std::fs;
use std::io;
use std::path::Path;

use crate::core::errors::VersionError;
use crate::core::manifest::{Manifest, ManifestFormat};
use crate::core::options::LoadOptions;

/// Where a manifest was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Embedded,
    File(std::path::PathBuf),
    Fallback,
}

impl std::fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestSource::Embedded => f.write_str("embedded manifest"),
            ManifestSource::File(path) => write!(f, "{}", path.display()),
            ManifestSource::Fallback => f.write_str("built-in defaults"),
        }
    }
}

/// Load the manifest from the highest-precedence source, without fallback.
///
/// # Errors
///
/// - [`VersionError::ManifestNotFound`] if no source exists
/// - [`VersionError::ManifestRead`] if the file cannot be read
/// - [`VersionError::ManifestParse`] or [`VersionError::InvalidManifest`]
///   if the content is malformed
pub fn load_manifest(options: &LoadOptions) -> Result<(Manifest, ManifestSource), VersionError> {
    if let Some(bytes) = options.embedded().filter(|b| !b.is_empty()) {
        let manifest = Manifest::parse(bytes, ManifestFormat::Yaml, "embedded manifest")?;
        return Ok((manifest, ManifestSource::Embedded));
    }

    match options.manifest_path() {
        Some(path) => {
            let manifest = read_manifest_file(path, options.strict())?;
            Ok((manifest, ManifestSource::File(path.to_path_buf())))
        }
        None => Err(VersionError::ManifestNotFound {
            location: "no embedded manifest or manifest path configured".to_string(),
            strict: options.strict(),
        }),
    }
}

/// Load the manifest, substituting defaults for a missing one outside strict
/// mode.
pub fn resolve_manifest(
    options: &LoadOptions,
) -> Result<(Manifest, ManifestSource), VersionError> {
    match load_manifest(options) {
        Ok(found) => Ok(found),
        Err(err) if err.is_recoverable() => {
            tracing::debug!(error = %err, "no version manifest, using defaults");
            Ok((Manifest::fallback(), ManifestSource::Fallback))
        }
        Err(err) => Err(err),
    }
}

/// Read and parse one manifest file.
pub fn read_manifest_file(path: &Path, strict: bool) -> Result<Manifest, VersionError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(VersionError::ManifestNotFound {
                location: path.display().to_string(),
                strict,
            });
        }
        Err(e) => {
            return Err(VersionError::ManifestRead {
                path: path.display().to_string(),
                message: e.to_string(),
            });
        }
    };

    let format = ManifestFormat::from_path(path);
    tracing::debug!(path = %path.display(), %format, "parsing version manifest");
    Manifest::parse(&bytes, format, &path.display().to_string())
}
