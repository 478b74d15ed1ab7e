//! Windows-specific implementation using Win32 API and Direct2D.
//!
//! - [`app`]: overlay window, timers, message loop
//! - [`surface`], [`pin`]: the overlay window behind the core traits
//! - [`registry`], [`startup`]: registry reads and the autorun entry
//! - [`input`]: polled modifier keys and cursor
//! - [`ui`]: renderer, tray, settings dialog, message boxes

pub mod app;
pub mod input;
pub mod pin;
pub mod registry;
pub mod startup;
pub mod surface;
pub mod ui;

use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{PostMessageW, WM_APP};

pub use app::run;

/// Posted to the overlay window after something was published on the bus.
pub const WM_APP_EVENTS: u32 = WM_APP + 1;

/// Null-terminated UTF-16 for Win32 string parameters.
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Ask the overlay window to drain the event bus.
pub fn post_wake(overlay: HWND) {
    unsafe {
        let _ = PostMessageW(Some(overlay), WM_APP_EVENTS, WPARAM(0), LPARAM(0));
    }
}
