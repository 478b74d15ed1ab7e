//! Derived virtual-desktop identity.

use super::constants::FALLBACK_DESKTOP_NAME;

/// Name and 1-based index of the active virtual desktop. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopInfo {
    pub name: String,
    pub index: usize,
}

impl Default for DesktopInfo {
    fn default() -> Self {
        Self {
            name: FALLBACK_DESKTOP_NAME.to_string(),
            index: 1,
        }
    }
}

impl DesktopInfo {
    /// Info for an unnamed desktop at `index`.
    pub fn unnamed(index: usize) -> Self {
        Self {
            name: format!("Desktop {}", index),
            index,
        }
    }
}
