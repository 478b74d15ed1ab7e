//! Configuration constants and default values.
//!
//! This module contains all application constants including settings
//! defaults, validation limits, timer cadences and registry locations.

use std::time::Duration;

// === Identity ===

/// Application name, used for the config directory and the autorun entry.
pub const APP_NAME: &str = "VirtualDesktopOverlay";

/// Human readable name shown in the tray tooltip and dialogs.
pub const APP_DISPLAY_NAME: &str = "Virtual Desktop Overlay";

/// Settings file name (beside the executable or in the app-data directory).
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Log file name in the app-data directory.
pub const LOG_FILE_NAME: &str = "overlay.log";

// === Settings Defaults ===

/// Default overlay width in pixels.
pub const DEFAULT_WIDTH: f64 = 300.0;

/// Default overlay height in pixels.
pub const DEFAULT_HEIGHT: f64 = 50.0;

/// Default background opacity [0.0, 1.0].
pub const DEFAULT_OPACITY: f64 = 0.8;

/// Default font size in points.
pub const DEFAULT_FONT_SIZE: i32 = 18;

/// Default font family.
pub const DEFAULT_FONT_FAMILY: &str = "Segoe UI";

// === Validation Limits ===

/// Minimum overlay width in pixels.
pub const MIN_WIDTH: i32 = 100;

/// Maximum overlay width in pixels.
pub const MAX_WIDTH: i32 = 2000;

/// Minimum overlay height in pixels.
pub const MIN_HEIGHT: i32 = 20;

/// Maximum overlay height in pixels.
pub const MAX_HEIGHT: i32 = 1000;

/// Minimum font size.
pub const MIN_FONT_SIZE: i32 = 10;

/// Maximum font size.
pub const MAX_FONT_SIZE: i32 = 72;

/// Opacity range.
pub const MIN_OPACITY: f64 = 0.0;
pub const MAX_OPACITY: f64 = 1.0;

// === Default Placement ===

/// Gap between the overlay and the right screen edge.
pub const DEFAULT_RIGHT_MARGIN: f64 = 20.0;

/// Gap between the overlay and the bottom screen edge (leaves room for the taskbar).
pub const DEFAULT_BOTTOM_MARGIN: f64 = 60.0;

// === Behaviour ===

/// How often the active virtual desktop is re-read.
pub const DESKTOP_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Input polling cadence: modifiers, hover and animation frames.
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Duration of the hover cross-fade.
pub const FADE_DURATION: Duration = Duration::from_millis(200);

/// Size of the bottom-right resize grip in pixels.
pub const RESIZE_GRIP: i32 = 12;

/// Accent background painted while unlocked (A, R, G, B).
pub const UNLOCKED_HIGHLIGHT: (u8, u8, u8, u8) = (100, 0, 120, 215);

/// Name shown whenever the desktop cannot be resolved.
pub const FALLBACK_DESKTOP_NAME: &str = "Desktop 1";

/// First Windows build with virtual desktops.
pub const MIN_WINDOWS_BUILD: u32 = 10240;

// === Registry Locations (all under HKCU unless noted) ===

/// Explorer's virtual desktop state.
pub const REG_VIRTUAL_DESKTOPS: &str =
    r"Software\Microsoft\Windows\CurrentVersion\Explorer\VirtualDesktops";

/// Global per-desktop names.
pub const REG_VIRTUAL_DESKTOP_NAMES: &str =
    r"Software\Microsoft\Windows\CurrentVersion\Explorer\VirtualDesktops\Desktops";

/// Session-scoped Explorer state.
pub const REG_SESSION_INFO: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\SessionInfo";

/// Value holding the concatenated desktop GUIDs.
pub const REG_VALUE_DESKTOP_IDS: &str = "VirtualDesktopIDs";

/// Value holding the current desktop GUID.
pub const REG_VALUE_CURRENT_DESKTOP: &str = "CurrentVirtualDesktop";

/// Value holding a desktop's display name.
pub const REG_VALUE_NAME: &str = "Name";

/// Per-user light/dark preference.
pub const REG_PERSONALIZE: &str = r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";

/// Value under [`REG_PERSONALIZE`]: 1 = light apps.
pub const REG_VALUE_APPS_LIGHT: &str = "AppsUseLightTheme";

/// Per-user autorun entries.
pub const REG_RUN: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// OS version information (HKLM).
pub const REG_WINDOWS_NT_VERSION: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion";

/// Value under [`REG_WINDOWS_NT_VERSION`].
pub const REG_VALUE_BUILD_NUMBER: &str = "CurrentBuildNumber";
