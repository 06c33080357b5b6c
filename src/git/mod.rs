//! git
//!
//! The single doorway to the external `git` binary.
//!
//! # Trust
//!
//! Git is only ever consulted as a last-resort source of commit provenance,
//! and its output is treated as untrusted input:
//!
//! - The binary is resolved from `PATH` and must sit in one of
//!   [`TRUSTED_GIT_LOCATIONS`] (not checked on Windows)
//! - Every command runs with [`GIT_COMMAND_TIMEOUT`], a closed stdin, and
//!   terminal prompts disabled
//! - A commit only enters a snapshot through [`CommitHash`] validation
//!
//! Every failure is reported as `None`. Callers fall back to defaults.
//!
//! # Testing
//!
//! The pipeline talks to git through the [`GitProbe`] trait so tests can
//! substitute a fixed answer for the real process.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::types::CommitHash;

/// Wall-clock limit for one git invocation.
pub const GIT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Absolute paths a resolved git binary may live at.
pub const TRUSTED_GIT_LOCATIONS: [&str; 3] =
    ["/usr/bin/git", "/usr/local/bin/git", "/opt/homebrew/bin/git"];

/// Stdout kept from one git invocation.
pub const MAX_OUTPUT_BYTES: u64 = 64 * 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Source of repository provenance.
pub trait GitProbe: Send + Sync {
    /// The commit checked out in the working directory.
    fn head_commit(&self) -> Option<CommitHash>;

    /// A tag pointing exactly at the checked-out commit.
    fn exact_tag(&self) -> Option<String>;
}

/// Probe that shells out to the system git binary.
#[derive(Debug, Clone)]
pub struct SystemGit {
    timeout: Duration,
    working_dir: Option<PathBuf>,
}

impl Default for SystemGit {
    fn default() -> Self {
        SystemGit {
            timeout: GIT_COMMAND_TIMEOUT,
            working_dir: None,
        }
    }
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run git in this directory instead of the process working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn run(&self, args: &[&str]) -> Option<String> {
        let binary = resolve_trusted_git_binary()?;
        let output = run_with_timeout(&binary, args, self.working_dir.as_deref(), self.timeout)?;
        let trimmed = output.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl GitProbe for SystemGit {
    fn head_commit(&self) -> Option<CommitHash> {
        let raw = self.run(&["rev-parse", "HEAD"])?;
        match CommitHash::new(raw) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "git returned an invalid commit hash, ignoring");
                None
            }
        }
    }

    fn exact_tag(&self) -> Option<String> {
        self.run(&["describe", "--tags", "--exact-match"])
    }
}

/// Locate git on `PATH` and check it against the allow-list.
pub fn resolve_trusted_git_binary() -> Option<PathBuf> {
    let path = match which::which("git") {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "git binary not found");
            return None;
        }
    };

    if cfg!(windows) || is_trusted_location(&path) {
        Some(path)
    } else {
        tracing::warn!(path = %path.display(), "git binary outside trusted locations, skipping");
        None
    }
}

/// Check a path against [`TRUSTED_GIT_LOCATIONS`].
pub fn is_trusted_location(path: &Path) -> bool {
    TRUSTED_GIT_LOCATIONS
        .iter()
        .any(|trusted| path == Path::new(trusted))
}

/// Run a command and return its stdout if it exits successfully in time.
///
/// Stdout is drained on a helper thread while the child is polled, so a
/// chatty child never stalls on a full pipe. At most [`MAX_OUTPUT_BYTES`]
/// are kept; the rest is read and discarded. The child is killed once
/// `timeout` elapses. Stderr is discarded.
pub fn run_with_timeout(
    binary: &Path,
    args: &[&str],
    working_dir: Option<&Path>,
    timeout: Duration,
) -> Option<String> {
    let mut cmd = Command::new(binary);
    cmd.args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let start = Instant::now();
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!(binary = %binary.display(), error = %e, "failed to spawn");
            return None;
        }
    };

    let Some(mut stdout) = child.stdout.take() else {
        let _ = child.kill();
        let _ = child.wait();
        return None;
    };
    let reader = thread::spawn(move || {
        let mut kept = Vec::new();
        (&mut stdout)
            .take(MAX_OUTPUT_BYTES)
            .read_to_end(&mut kept)
            .ok()?;
        io::copy(&mut stdout, &mut io::sink()).ok()?;
        Some(kept)
    });

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "failed to poll child");
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
        }
        if start.elapsed() > timeout {
            tracing::warn!(
                binary = %binary.display(),
                ?args,
                timeout_ms = timeout.as_millis() as u64,
                "command timed out, killing"
            );
            let _ = child.kill();
            let _ = child.wait();
            // A grandchild may still hold the pipe open; leave the reader
            // detached rather than block on it.
            return None;
        }
        thread::sleep(POLL_INTERVAL);
    };

    if !status.success() {
        tracing::debug!(binary = %binary.display(), ?args, %status, "command failed");
        return None;
    }

    let kept = reader.join().ok()??;
    String::from_utf8(kept).ok()
}
