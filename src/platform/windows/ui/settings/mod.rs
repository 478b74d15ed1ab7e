//! Settings dialog.

pub mod window;

pub use window::{open_settings_window, settings_hwnd};
