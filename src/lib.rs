//! Core of the virtual desktop overlay. Everything outside `platform` is
//! plain Rust so tests run as normal integration tests on any OS.

pub mod compat;
pub mod desktop;
pub mod events;
pub mod logging;
pub mod model;
pub mod overlay;
pub mod settings;

#[cfg(target_os = "windows")]
pub mod platform;

// Re-export model types for convenience
pub use model::{DesktopInfo, Settings, Theme};

// Re-export event types for convenience
pub use events::{AppEvent, EventBus, EventPublisher};

/// Clamp a value to [lo, hi]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
