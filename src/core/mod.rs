//! core
//!
//! Domain types and data model for version metadata.
//!
//! # Modules
//!
//! - [`semver`] - Semantic version parsing and precedence
//! - [`types`] - Strong types: CommitHash, TreeState, Dimension, CustomValue
//! - [`manifest`] - Manifest document schema and parsing
//! - [`info`] - The immutable enriched snapshot
//! - [`options`] - Configuration for a pipeline run
//! - [`errors`] - Error taxonomy shared by every layer
//!
//! # Design Principles
//!
//! - Strong typing keeps untrusted strings out of snapshots
//! - A published snapshot is never mutated
//! - Every error carries an actionable hint

pub mod errors;
pub mod info;
pub mod manifest;
pub mod options;
pub mod semver;
pub mod types;
