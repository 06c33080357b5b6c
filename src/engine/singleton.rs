//! engine::singleton
//!
//! The process-wide snapshot and its one-shot lifecycle.
//!
//! # States
//!
//! ```text
//! Uninitialized -> Initializing -> Ready | Failed
//!        ^                           |
//!        +------- reset (tests) -----+
//! ```
//!
//! # Invariants
//!
//! - The pipeline runs at most once per slot, however many threads race
//!   into [`initialize`] and [`get`]. All of them observe the same outcome.
//! - A failed outcome is stored and returned to every later reader.
//! - A panic inside the pipeline is caught and stored as
//!   [`VersionError::Panicked`], so the slot still settles as failed.
//! - Once a slot is settled, reads are an atomic swap-cell load plus a
//!   `OnceLock` read; no lock is taken.
//! - [`reset`] swaps in a fresh slot under its own lock. It panics outside
//!   a test harness.
//!
//! Validators run while the slot is being settled and must not call [`get`]
//! or [`initialize`] themselves.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use arc_swap::ArcSwap;

use crate::core::errors::VersionError;
use crate::core::info::Info;
use crate::core::options::LoadOptions;

/// Observable state of the process-wide instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;
const FAILED: u8 = 3;

type Outcome = Result<Arc<Info>, VersionError>;

struct Slot {
    outcome: OnceLock<Outcome>,
    state: AtomicU8,
}

impl Slot {
    const fn new() -> Self {
        Slot {
            outcome: OnceLock::new(),
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    /// Settle the slot, running the pipeline if nobody has yet.
    ///
    /// Returns the outcome and whether this call ran the pipeline.
    fn settle(&self, options: impl FnOnce() -> LoadOptions) -> (&Outcome, bool) {
        let mut ran = false;
        let outcome = self.outcome.get_or_init(|| {
            ran = true;
            self.state.store(INITIALIZING, Ordering::Release);
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| super::load(&options()))) {
                Ok(result) => result.map(Arc::new),
                Err(payload) => Err(VersionError::Panicked {
                    message: panic_message(payload.as_ref()),
                }),
            };
            self.state.store(
                if outcome.is_ok() { READY } else { FAILED },
                Ordering::Release,
            );
            outcome
        });
        (outcome, ran)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

static CURRENT: OnceLock<ArcSwap<Slot>> = OnceLock::new();
static RESET_LOCK: Mutex<()> = Mutex::new(());

fn slots() -> &'static ArcSwap<Slot> {
    CURRENT.get_or_init(|| ArcSwap::from_pointee(Slot::new()))
}

fn current() -> Arc<Slot> {
    slots().load_full()
}

/// Run the pipeline once for the process-wide instance.
///
/// Only valid as the first transition out of the uninitialized state.
///
/// # Errors
///
/// - [`VersionError::AlreadyInitialized`] if [`initialize`] or [`get`]
///   already settled the instance, whatever the outcome was
/// - The pipeline error if this call ran the pipeline and it failed
pub fn initialize(options: LoadOptions) -> Result<Arc<Info>, VersionError> {
    let slot = current();
    let (outcome, ran) = slot.settle(|| options);
    if !ran {
        return Err(VersionError::AlreadyInitialized);
    }
    match outcome {
        Ok(info) => {
            let _span = info.span().entered();
            tracing::info!("version metadata initialized");
            Ok(Arc::clone(info))
        }
        Err(err) => {
            tracing::error!(error = %err, "version metadata initialization failed");
            Err(err.clone())
        }
    }
}

/// Read the process-wide instance, initializing it with default options on
/// first use.
///
/// # Errors
///
/// [`VersionError::NotInitialized`] carrying the stored failure if the
/// pipeline failed.
pub fn get() -> Result<Arc<Info>, VersionError> {
    let slot = current();
    let outcome = match slot.outcome.get() {
        Some(outcome) => outcome,
        None => {
            let (outcome, ran) = slot.settle(LoadOptions::default);
            if ran {
                tracing::debug!(ok = outcome.is_ok(), "version metadata auto-initialized");
            }
            outcome
        }
    };
    match outcome {
        Ok(info) => Ok(Arc::clone(info)),
        Err(err) => Err(VersionError::NotInitialized {
            cause: Box::new(err.clone()),
        }),
    }
}

/// Read the process-wide instance.
///
/// # Panics
///
/// Panics with the error text if the instance cannot be loaded.
pub fn must_get() -> Arc<Info> {
    match get() {
        Ok(info) => info,
        Err(err) => panic!("verstamp: {err}"),
    }
}

/// Check whether the process-wide instance is ready. Never triggers
/// initialization.
pub fn is_initialized() -> bool {
    matches!(current().outcome.get(), Some(Ok(_)))
}

/// Current lifecycle state of the process-wide instance.
pub fn state() -> LifecycleState {
    match current().state.load(Ordering::Acquire) {
        INITIALIZING => LifecycleState::Initializing,
        READY => LifecycleState::Ready,
        FAILED => LifecycleState::Failed,
        _ => LifecycleState::Uninitialized,
    }
}

/// Return the process-wide instance to the uninitialized state.
///
/// Tests that reset must not run concurrently with other users of the
/// instance.
///
/// # Panics
///
/// Panics unless running inside a test harness.
pub fn reset() {
    if !running_under_test_harness() {
        panic!("verstamp::engine::reset is only available in tests");
    }
    let _guard = RESET_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    slots().store(Arc::new(Slot::new()));
    tracing::debug!("version singleton reset");
}

fn running_under_test_harness() -> bool {
    if cfg!(test) {
        return true;
    }
    std::env::current_exe()
        .map(|exe| is_test_binary(&exe))
        .unwrap_or(false)
}

/// Cargo places test executables in `target/<profile>/deps` with a
/// `-<16 hex>` suffix.
fn is_test_binary(exe: &Path) -> bool {
    let in_deps = exe
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|dir| dir == "deps");
    let hashed = exe
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.rsplit_once('-'))
        .is_some_and(|(_, hash)| hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()));
    in_deps && hashed
}
