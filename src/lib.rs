//! verstamp - Multi-dimensional runtime version metadata
//!
//! verstamp loads a declarative manifest describing a project's version
//! alongside its database schema, API, and component versions, enriches it
//! with source-control and build provenance, validates it against minimum
//! version constraints, and publishes the result as an immutable snapshot.
//!
//! # Architecture
//!
//! - [`core`] - Data model: semver, manifest, snapshot, options, errors
//! - [`loader`] - Manifest source precedence and fallback policy
//! - [`enrich`] - Injected, toolchain, and git provenance layers
//! - [`git`] - Trusted, time-bounded access to the git binary
//! - [`validate`] - Pluggable fail-fast validators
//! - [`engine`] - The load pipeline and the process-wide instance
//! - [`http`] - `/version` and `/health` endpoints (feature `http`)
//! - [`cli`] - The `verstamp` command
//! - [`ui`] - Text projections for the command line
//!
//! # Quick start
//!
//! ```no_run
//! let info = verstamp::must_get();
//! println!("{info}");
//! if let Some(db) = info.schema_version("postgres_main") {
//!     println!("schema {db}");
//! }
//! ```
//!
//! # Invariants
//!
//! 1. A published snapshot is never mutated
//! 2. The process-wide pipeline runs at most once
//! 3. A failed load never publishes a partial snapshot
//! 4. Missing provenance sources degrade to defaults, never to errors

pub mod cli;
pub mod core;
pub mod engine;
pub mod enrich;
pub mod git;
#[cfg(feature = "http")]
pub mod http;
pub mod loader;
pub mod ui;
pub mod validate;

pub use crate::core::errors::{ErrorKind, ValidationError, VersionError};
pub use crate::core::info::{BuildInfo, GitInfo, Info, ProjectVersion};
pub use crate::core::options::LoadOptions;
pub use crate::core::semver::SemVer;
pub use crate::engine::{get, initialize, is_initialized, must_get, new_info, reset};
pub use crate::validate::{DimensionValidator, FnValidator, ValidationContext, Validator};
