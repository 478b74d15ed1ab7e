//! UI components for Windows.

pub mod dialogs;
pub mod fonts;
pub mod overlay;
pub mod settings;
pub mod tray;
