//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # View flags
//!
//! At most one of `--json`, `--compact`, `--schemas`, `--apis`,
//! `--components`, `--git`, `--build` may be given. Without any, the full
//! report is printed.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::core::manifest::DEFAULT_MANIFEST_FILENAME;
use crate::ui::output::Projection;

/// verstamp - Display multi-dimensional version information
#[derive(Parser, Debug)]
#[command(name = "verstamp")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("view")
        .args(["json", "compact", "schemas", "apis", "components", "git", "build"])
        .multiple(false)
))]
#[command(after_help = "\
EXAMPLES:
    # Full report from ./versions.yaml
    verstamp

    # Machine-readable output
    verstamp --json

    # Schema versions from another manifest
    verstamp --manifest deploy/versions.yaml --schemas")]
pub struct Cli {
    /// Path to the version manifest
    #[arg(long, env = "VERSTAMP_MANIFEST", default_value = DEFAULT_MANIFEST_FILENAME)]
    pub manifest: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show a single-line summary
    #[arg(long)]
    pub compact: bool,

    /// Show only database schema versions
    #[arg(long)]
    pub schemas: bool,

    /// Show only API versions
    #[arg(long)]
    pub apis: bool,

    /// Show only component versions
    #[arg(long)]
    pub components: bool,

    /// Show only git information
    #[arg(long)]
    pub git: bool,

    /// Show only build information
    #[arg(long)]
    pub build: bool,

    /// Fail if the manifest is missing instead of using defaults
    #[arg(long)]
    pub strict: bool,

    /// Skip git provenance lookup
    #[arg(long)]
    pub no_git: bool,

    /// Serve /version and /health on this address instead of printing
    #[arg(long, value_name = "ADDR", conflicts_with = "view")]
    pub serve: Option<std::net::SocketAddr>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The view selected by the flags.
    pub fn projection(&self) -> Projection {
        if self.json {
            Projection::Json
        } else if self.compact {
            Projection::Compact
        } else if self.schemas {
            Projection::Schemas
        } else if self.apis {
            Projection::Apis
        } else if self.components {
            Projection::Components
        } else if self.git {
            Projection::Git
        } else if self.build {
            Projection::Build
        } else {
            Projection::Full
        }
    }
}
