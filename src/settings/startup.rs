//! Run-at-startup registration.

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot determine executable path")]
    ExePath(#[source] std::io::Error),

    #[error("registry write failed: {0}")]
    Registry(String),
}

/// A per-user autorun entry keyed by application name.
pub trait StartupRegistration {
    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool) -> Result<(), StartupError>;
}

/// Registration that only remembers the flag (non-Windows targets).
#[derive(Debug, Default, Clone)]
pub struct InMemoryStartup {
    pub enabled: bool,
    pub writes: usize,
}

impl StartupRegistration for InMemoryStartup {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), StartupError> {
        self.enabled = enabled;
        self.writes += 1;
        Ok(())
    }
}

/// Update the OS entry when the run-at-startup flag changed.
///
/// Failures are logged and the write is skipped. Returns whether a write
/// was attempted.
pub fn sync_startup(previous: bool, desired: bool, registration: &mut dyn StartupRegistration) -> bool {
    if previous == desired {
        return false;
    }
    match registration.set_enabled(desired) {
        Ok(()) => info!(enabled = desired, "run-at-startup updated"),
        Err(e) => warn!(enabled = desired, error = %e, "run-at-startup update skipped"),
    }
    true
}

/// Command line stored in the autorun entry: the quoted executable path.
pub fn startup_command(exe: &Path) -> String {
    format!("\"{}\"", exe.display())
}
