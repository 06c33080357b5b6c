//! enrich::build_info
//!
//! Version-control metadata recorded by the build toolchain.
//!
//! Builds that use `vergen` (or export the same variables themselves) carry
//! `VERGEN_GIT_SHA`, `VERGEN_GIT_COMMIT_TIMESTAMP`, and `VERGEN_GIT_DIRTY`.
//! A binary built without them has no [`BuildMetadata`].

/// Git metadata recorded by the toolchain at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildMetadata {
    pub revision: Option<String>,
    pub commit_time: Option<String>,
    pub modified: Option<bool>,
}

impl BuildMetadata {
    /// Metadata captured when this crate was compiled, if any.
    pub fn compiled() -> Option<Self> {
        Self::from_values(
            option_env!("VERGEN_GIT_SHA"),
            option_env!("VERGEN_GIT_COMMIT_TIMESTAMP"),
            option_env!("VERGEN_GIT_DIRTY"),
        )
    }

    fn from_values(
        revision: Option<&str>,
        commit_time: Option<&str>,
        dirty: Option<&str>,
    ) -> Option<Self> {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);
        let metadata = BuildMetadata {
            revision: non_empty(revision),
            commit_time: non_empty(commit_time),
            modified: dirty.and_then(|d| match d {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            }),
        };

        if metadata == BuildMetadata::default() {
            None
        } else {
            Some(metadata)
        }
    }
}
