//! Windows entry point.
//!
//! The overlay itself lives in the library (`platform::windows`); this only
//! turns a failed run into a logged error and a non-zero exit code.

use std::process::ExitCode;

use tracing::error;

/// Main entry point for Windows.
pub fn run() -> ExitCode {
    match vdesk_overlay::platform::windows::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Virtual desktop overlay error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
