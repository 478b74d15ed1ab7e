//! Application events for inter-module communication.
//!
//! These events represent high-level actions published by the tray and the
//! settings dialog and handled by the overlay on the UI thread.
//! This module is pure Rust with no FFI dependencies, making it fully testable.

use crate::model::Settings;

/// Application-level events.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // === Tray Events ===
    /// Open (or focus) the settings dialog
    OpenSettings,

    /// Toggle the unlocked state from the tray menu
    ToggleLock,

    /// Quit the application
    Exit,

    // === Settings Dialog Events ===
    /// A field changed; show these values without persisting
    PreviewSettings(Settings),

    /// Save pressed with valid values
    SaveSettings(Settings),

    /// Cancel pressed or dialog closed without saving
    CancelSettings,

    /// "Reset position" pressed
    ResetPosition,

    /// The dialog window is gone
    SettingsClosed,
}

impl AppEvent {
    /// Returns a human-readable description of the event for debugging.
    pub fn description(&self) -> &'static str {
        match self {
            AppEvent::OpenSettings => "Open settings dialog",
            AppEvent::ToggleLock => "Toggle overlay lock",
            AppEvent::Exit => "Exit application",
            AppEvent::PreviewSettings(_) => "Preview settings",
            AppEvent::SaveSettings(_) => "Save settings",
            AppEvent::CancelSettings => "Cancel settings",
            AppEvent::ResetPosition => "Reset overlay position",
            AppEvent::SettingsClosed => "Settings dialog closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_events_have_descriptions() {
        let events = [
            AppEvent::OpenSettings,
            AppEvent::ToggleLock,
            AppEvent::Exit,
            AppEvent::PreviewSettings(Settings::default()),
            AppEvent::SaveSettings(Settings::default()),
            AppEvent::CancelSettings,
            AppEvent::ResetPosition,
            AppEvent::SettingsClosed,
        ];

        for event in events {
            assert!(!event.description().is_empty());
        }
    }
}
