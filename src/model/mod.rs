//! Application domain model.
//!
//! This module contains pure data (no FFI dependencies): the persisted
//! settings record, theme resolution, desktop identity and constants.
//!
//! Persistence lives in [`crate::settings`]; Win32 access in `platform::windows`.

pub mod constants;
pub mod desktop;
pub mod settings;
pub mod theme;

pub use constants::*;
pub use desktop::DesktopInfo;
pub use settings::Settings;
pub use theme::{Color, EffectiveTheme, FixedThemeProbe, Palette, Theme, ThemeProbe};
