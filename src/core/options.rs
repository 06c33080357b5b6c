//! core::options
//!
//! Configuration for one run of the loading pipeline.
//!
//! # Defaults
//!
//! | Setting        | Default            |
//! |----------------|--------------------|
//! | manifest path  | `versions.yaml`    |
//! | embedded bytes | none               |
//! | git enrichment | on                 |
//! | build info     | on                 |
//! | strict mode    | off                |
//! | validators     | none               |
//!
//! Options are built with consuming `with_*` methods:
//!
//! ```
//! use verstamp::core::options::LoadOptions;
//! use verstamp::validate::DimensionValidator;
//!
//! let options = LoadOptions::default()
//!     .with_manifest_path("config/versions.yaml")
//!     .with_git_info(false)
//!     .with_validator(DimensionValidator::min_schema("db", "45"));
//! assert!(!options.git_info_enabled());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::manifest::DEFAULT_MANIFEST_FILENAME;
use crate::enrich::{BuildMetadata, InjectedValues};
use crate::git::{GitProbe, SystemGit};
use crate::validate::{ValidationContext, Validator};

/// Settings for loading, enriching, and validating version metadata.
#[derive(Clone)]
pub struct LoadOptions {
    pub(crate) manifest_path: Option<PathBuf>,
    pub(crate) embedded: Option<Arc<[u8]>>,
    pub(crate) include_git: bool,
    pub(crate) include_build: bool,
    pub(crate) strict: bool,
    pub(crate) validators: Vec<Arc<dyn Validator>>,
    pub(crate) context: ValidationContext,
    pub(crate) git_probe: Arc<dyn GitProbe>,
    pub(crate) injected: InjectedValues,
    pub(crate) build_metadata: Option<BuildMetadata>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            manifest_path: Some(PathBuf::from(DEFAULT_MANIFEST_FILENAME)),
            embedded: None,
            include_git: true,
            include_build: true,
            strict: false,
            validators: Vec::new(),
            context: ValidationContext::default(),
            git_probe: Arc::new(SystemGit::default()),
            injected: InjectedValues::compiled(),
            build_metadata: BuildMetadata::compiled(),
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the manifest from this file when no embedded bytes are set.
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Do not look for a manifest file at all.
    pub fn without_manifest_path(mut self) -> Self {
        self.manifest_path = None;
        self
    }

    /// Use these bytes as the manifest. Non-empty bytes take precedence over
    /// the manifest path and are always parsed as YAML.
    pub fn with_embedded(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        self.embedded = Some(Arc::from(bytes));
        self
    }

    pub fn with_git_info(mut self, enabled: bool) -> Self {
        self.include_git = enabled;
        self
    }

    pub fn with_build_info(mut self, enabled: bool) -> Self {
        self.include_build = enabled;
        self
    }

    /// In strict mode any manifest error is fatal instead of falling back to
    /// defaults.
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Append a validator. Validators run in the order they were added.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn with_validators<I>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Validator>>,
    {
        self.validators.extend(validators);
        self
    }

    /// Context handed to every validator (cancellation, deadline).
    pub fn with_context(mut self, context: ValidationContext) -> Self {
        self.context = context;
        self
    }

    /// Replace the external git probe used by the fallback layer.
    pub fn with_git_probe(mut self, probe: Arc<dyn GitProbe>) -> Self {
        self.git_probe = probe;
        self
    }

    /// Replace the values baked in at compile time.
    pub fn with_injected(mut self, injected: InjectedValues) -> Self {
        self.injected = injected;
        self
    }

    /// Replace the toolchain-recorded build metadata. `None` means the
    /// binary carries none.
    pub fn with_build_metadata(mut self, metadata: Option<BuildMetadata>) -> Self {
        self.build_metadata = metadata;
        self
    }

    pub fn manifest_path(&self) -> Option<&Path> {
        self.manifest_path.as_deref()
    }

    pub fn embedded(&self) -> Option<&[u8]> {
        self.embedded.as_deref()
    }

    pub fn git_info_enabled(&self) -> bool {
        self.include_git
    }

    pub fn build_info_enabled(&self) -> bool {
        self.include_build
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("manifest_path", &self.manifest_path)
            .field("embedded_len", &self.embedded.as_ref().map(|b| b.len()))
            .field("include_git", &self.include_git)
            .field("include_build", &self.include_build)
            .field("strict", &self.strict)
            .field("validators", &self.validators.len())
            .field("injected", &self.injected)
            .field("build_metadata", &self.build_metadata)
            .finish_non_exhaustive()
    }
}
