//! enrich::injected
//!
//! Provenance baked into the binary at compile time.
//!
//! Release pipelines set these environment variables when running
//! `cargo build`; the values are captured with `option_env!`:
//!
//! | Variable                    | Default   |
//! |-----------------------------|-----------|
//! | `VERSTAMP_GIT_COMMIT`       | `dev`     |
//! | `VERSTAMP_GIT_TAG`          | empty     |
//! | `VERSTAMP_GIT_TREE_STATE`   | `clean`   |
//! | `VERSTAMP_BUILD_TIME`       | `unknown` |
//! | `VERSTAMP_BUILD_USER`       | empty     |
//!
//! A slot still holding its default is treated as "not injected".

use crate::core::info::{DEFAULT_BUILD_TIME, DEFAULT_GIT_COMMIT};

const DEFAULT_TREE_STATE: &str = "clean";

/// Compile-time injected provenance values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedValues {
    pub commit: String,
    pub tag: String,
    pub tree_state: String,
    pub build_time: String,
    pub build_user: String,
}

impl Default for InjectedValues {
    /// All slots at their "not injected" defaults.
    fn default() -> Self {
        InjectedValues {
            commit: DEFAULT_GIT_COMMIT.to_string(),
            tag: String::new(),
            tree_state: DEFAULT_TREE_STATE.to_string(),
            build_time: DEFAULT_BUILD_TIME.to_string(),
            build_user: String::new(),
        }
    }
}

impl InjectedValues {
    /// Values captured when this crate was compiled.
    pub fn compiled() -> Self {
        InjectedValues {
            commit: option_env!("VERSTAMP_GIT_COMMIT")
                .unwrap_or(DEFAULT_GIT_COMMIT)
                .to_string(),
            tag: option_env!("VERSTAMP_GIT_TAG").unwrap_or("").to_string(),
            tree_state: option_env!("VERSTAMP_GIT_TREE_STATE")
                .unwrap_or(DEFAULT_TREE_STATE)
                .to_string(),
            build_time: option_env!("VERSTAMP_BUILD_TIME")
                .unwrap_or(DEFAULT_BUILD_TIME)
                .to_string(),
            build_user: option_env!("VERSTAMP_BUILD_USER").unwrap_or("").to_string(),
        }
    }

    pub(crate) fn has_commit(&self) -> bool {
        self.commit != DEFAULT_GIT_COMMIT
    }

    pub(crate) fn has_tree_state(&self) -> bool {
        self.tree_state != DEFAULT_TREE_STATE
    }

    pub(crate) fn has_build_time(&self) -> bool {
        self.build_time != DEFAULT_BUILD_TIME
    }
}
