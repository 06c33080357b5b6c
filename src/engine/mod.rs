//! engine
//!
//! Orchestrates the load lifecycle: Resolve -> Enrich -> Validate -> Publish.
//!
//! # Lifecycle
//!
//! ```text
//! LoadOptions -> resolve manifest -> Info (defaults) -> enrich git -> enrich build
//!             -> validators -> Info
//! ```
//!
//! A failure at any step discards the half-built snapshot. Nothing is
//! published unless every step succeeds.
//!
//! # Entry points
//!
//! - [`new_info`] runs the pipeline and returns an independent snapshot
//! - [`initialize`] runs it once for the process-wide instance
//! - [`get`] reads the process-wide instance, initializing with defaults
//! - [`must_get`] is [`get`] that panics on failure
//!
//! # Example
//!
//! ```no_run
//! use verstamp::core::options::LoadOptions;
//! use verstamp::validate::DimensionValidator;
//!
//! verstamp::engine::initialize(
//!     LoadOptions::default().with_validator(DimensionValidator::min_schema("db", "45")),
//! )?;
//! let info = verstamp::engine::get()?;
//! println!("{} schema db at {:?}", info, info.schema_version("db"));
//! # Ok::<(), verstamp::core::errors::VersionError>(())
//! ```

mod singleton;

pub use singleton::{get, initialize, is_initialized, must_get, reset, state, LifecycleState};

use crate::core::errors::VersionError;
use crate::core::info::Info;
use crate::core::options::LoadOptions;
use crate::enrich;
use crate::loader;
use crate::validate;

/// Run the full pipeline and return a snapshot not tied to the process-wide
/// instance.
///
/// # Errors
///
/// Any manifest error that is not recovered through defaults, or the first
/// validator rejection wrapped in [`VersionError::ValidationFailed`].
pub fn new_info(options: LoadOptions) -> Result<Info, VersionError> {
    load(&options)
}

pub(crate) fn load(options: &LoadOptions) -> Result<Info, VersionError> {
    let (manifest, source) = loader::resolve_manifest(options)?;
    tracing::debug!(%source, "version manifest resolved");

    let mut info = Info::from_manifest(manifest);

    if options.include_git {
        enrich::enrich_git(
            &mut info,
            &options.injected,
            options.build_metadata.as_ref(),
            options.git_probe.as_ref(),
        );
    }
    if options.include_build {
        enrich::enrich_build(&mut info, &options.injected);
    }

    validate::run_validators(&options.validators, &options.context, &info)?;
    Ok(info)
}
