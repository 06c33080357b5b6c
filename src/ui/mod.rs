//! ui
//!
//! Presentation of snapshots for people.
//!
//! # Modules
//!
//! - [`output`] - Text and JSON projections printed by the CLI

pub mod output;
