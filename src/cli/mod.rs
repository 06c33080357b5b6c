//! cli
//!
//! Command-line interface layer for verstamp.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Install the tracing subscriber
//! - Initialize the process-wide snapshot and print the selected view
//!
//! # Architecture
//!
//! The CLI layer is thin. It builds [`LoadOptions`] from flags, hands them to
//! [`crate::engine::initialize`], and renders the result through
//! [`crate::ui::output`]. Any pipeline error becomes a non-zero exit.

pub mod args;

pub use args::Cli;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::core::errors::{ErrorKind, VersionError};
use crate::core::options::LoadOptions;
use crate::engine;
use crate::ui::output;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    let options = LoadOptions::default()
        .with_manifest_path(&cli.manifest)
        .with_git_info(!cli.no_git)
        .with_strict_mode(cli.strict);

    let info = engine::initialize(options).map_err(|err| load_failure(&cli, err))?;

    if let Some(addr) = cli.serve {
        return serve(addr);
    }

    let rendered = output::render(&info, cli.projection())?;
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_failure(cli: &Cli, err: VersionError) -> anyhow::Error {
    let mut message = format!("failed to load version information: {err}");
    if let Some(hint) = err.hint() {
        message.push_str(&format!("\nHint: {hint}"));
    }
    if err.kind() == ErrorKind::ManifestNotFound {
        message.push_str(&format!(
            "\nMake sure {} exists or use --manifest to specify a different file",
            cli.manifest.display()
        ));
    }
    anyhow!(message)
}

#[cfg(feature = "http")]
fn serve(addr: std::net::SocketAddr) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(crate::http::serve(addr))?;
    Ok(())
}

#[cfg(not(feature = "http"))]
fn serve(_addr: std::net::SocketAddr) -> Result<()> {
    anyhow::bail!("--serve requires verstamp to be built with the `http` feature")
}
