//! Build script capturing compile-time provenance.
//!
//! Exports the active toolchain version as `VERSTAMP_RUSTC_VERSION` and asks
//! Cargo to rebuild when any injection slot changes.

use std::env;
use std::process::Command;

const INJECTED_VARS: [&str; 8] = [
    "VERSTAMP_GIT_COMMIT",
    "VERSTAMP_GIT_TAG",
    "VERSTAMP_GIT_TREE_STATE",
    "VERSTAMP_BUILD_TIME",
    "VERSTAMP_BUILD_USER",
    "VERGEN_GIT_SHA",
    "VERGEN_GIT_COMMIT_TIMESTAMP",
    "VERGEN_GIT_DIRTY",
];

fn main() {
    for var in INJECTED_VARS {
        println!("cargo:rerun-if-env-changed={var}");
    }
    println!("cargo:rerun-if-changed=build.rs");

    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=VERSTAMP_RUSTC_VERSION={version}");
}
