//! Operating system version gate.

use thiserror::Error;
use tracing::warn;

use crate::model::constants::MIN_WINDOWS_BUILD;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompatError {
    #[error(
        "This application requires Windows 10 or later (build {required}); \
         this system reports build {found}."
    )]
    WindowsTooOld { found: u32, required: u32 },
}

/// Parse the `CurrentBuildNumber` registry string.
pub fn parse_build_number(raw: &str) -> Option<u32> {
    raw.trim().trim_end_matches('\0').parse().ok()
}

/// Refuse to run below Windows 10. An unreadable build number is allowed
/// with a warning.
pub fn check_windows_build(build: Option<u32>) -> Result<(), CompatError> {
    match build {
        Some(found) if found < MIN_WINDOWS_BUILD => Err(CompatError::WindowsTooOld {
            found,
            required: MIN_WINDOWS_BUILD,
        }),
        Some(_) => Ok(()),
        None => {
            warn!("Windows build number unavailable, assuming a supported version");
            Ok(())
        }
    }
}
