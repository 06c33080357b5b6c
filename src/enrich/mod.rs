//! enrich
//!
//! Layers source-control and build provenance onto a fresh snapshot.
//!
//! # Git pass
//!
//! Three sources, always applied in this order. Each only fills a field that
//! earlier layers left at its default:
//!
//! 1. [`InjectedValues`] baked in at compile time
//! 2. [`BuildMetadata`] recorded by the build toolchain
//! 3. A [`GitProbe`] querying the git binary at run time
//!
//! # Build pass
//!
//! Injected build time and user win when set. The toolchain version is
//! always recorded.
//!
//! Enrichment never fails. Every missing source leaves the defaults in place.

mod build_info;
mod injected;

pub use build_info::BuildMetadata;
pub use injected::InjectedValues;

use crate::core::info::{toolchain_version, Info};
use crate::core::types::TreeState;
use crate::git::GitProbe;

/// Fill the snapshot's git provenance from all three sources.
pub fn enrich_git(
    info: &mut Info,
    injected: &InjectedValues,
    build: Option<&BuildMetadata>,
    probe: &dyn GitProbe,
) {
    apply_injected_git(info, injected);
    if let Some(build) = build {
        apply_build_metadata(info, build);
    }
    apply_git_fallback(info, probe);
}

/// Fill the snapshot's build provenance.
pub fn enrich_build(info: &mut Info, injected: &InjectedValues) {
    if injected.has_build_time() {
        info.build.time = injected.build_time.clone();
    }
    if !injected.build_user.is_empty() {
        info.build.user = injected.build_user.clone();
    }
    info.build.toolchain_version = toolchain_version().to_string();
}

fn apply_injected_git(info: &mut Info, injected: &InjectedValues) {
    if injected.has_commit() {
        info.git.commit = injected.commit.clone();
    }
    if !injected.tag.is_empty() {
        info.git.tag = injected.tag.clone();
    }
    if injected.has_tree_state() {
        match injected.tree_state.parse::<TreeState>() {
            Ok(state) => info.git.tree_state = state,
            Err(e) => tracing::warn!(error = %e, "ignoring injected tree state"),
        }
    }
}

fn apply_build_metadata(info: &mut Info, build: &BuildMetadata) {
    if !info.git.has_commit() {
        if let Some(revision) = &build.revision {
            info.git.commit = revision.clone();
        }
    }
    if info.git.commit_time.is_empty() {
        if let Some(time) = &build.commit_time {
            info.git.commit_time = time.clone();
        }
    }
    if build.modified == Some(true) {
        info.git.tree_state = TreeState::Dirty;
    }
}

fn apply_git_fallback(info: &mut Info, probe: &dyn GitProbe) {
    if !info.git.has_commit() {
        if let Some(commit) = probe.head_commit() {
            tracing::debug!(%commit, "commit resolved from git");
            info.git.commit = commit.into_string();
        }
    }
    if info.git.tag.is_empty() {
        if let Some(tag) = probe.exact_tag() {
            tracing::debug!(%tag, "tag resolved from git");
            info.git.tag = tag;
        }
    }
}
