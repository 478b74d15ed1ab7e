//! Seams between the overlay logic and the native window.

use thiserror::Error;
use tracing::{error, warn};

use super::geometry::Bounds;
use super::machine::CursorGlyph;

/// Failure of a native window call.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("window handle is not available")]
    NoWindow,

    #[error("native call {call} failed: {message}")]
    Native { call: &'static str, message: String },
}

/// The native overlay window as seen by the controller.
///
/// All calls are best-effort; implementations report failures but the
/// controller never aborts on them.
pub trait WindowSurface {
    /// Current click-through flag as reported by the OS, if readable.
    fn click_through(&self) -> Option<bool>;

    fn set_click_through(&mut self, enabled: bool) -> Result<(), SurfaceError>;

    fn set_cursor(&mut self, glyph: CursorGlyph);

    fn capture_mouse(&mut self, capture: bool);

    /// Current window rectangle in screen pixels.
    fn bounds(&self) -> Bounds;

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), SurfaceError>;

    /// Ask for a repaint at the next opportunity.
    fn request_redraw(&mut self);
}

/// Set the click-through flag and verify it stuck.
///
/// On a mismatch the flag is re-applied exactly once; a second mismatch is
/// logged and left alone. Returns whether the OS reports the wanted state.
pub fn apply_click_through<S: WindowSurface + ?Sized>(surface: &mut S, enabled: bool) -> bool {
    if let Err(e) = surface.set_click_through(enabled) {
        warn!(enabled, error = %e, "setting click-through failed");
    }
    if surface.click_through() == Some(enabled) {
        return true;
    }

    warn!(enabled, "click-through mismatch, re-applying once");
    if let Err(e) = surface.set_click_through(enabled) {
        warn!(enabled, error = %e, "re-applying click-through failed");
    }
    let ok = surface.click_through() == Some(enabled);
    if !ok {
        error!(enabled, "click-through still mismatched after re-application");
    }
    ok
}

/// Failure of the desktop pinning capability.
#[derive(Debug, Error)]
pub enum PinError {
    #[error("virtual desktop manager unavailable: {0}")]
    Unavailable(String),

    #[error("pinning failed: {0}")]
    Failed(String),
}

/// Keep the overlay visible on every virtual desktop.
pub trait DesktopPin {
    /// Best effort; callers log the error and carry on.
    fn pin_to_all_desktops(&self) -> Result<(), PinError>;
}

/// Pinning for platforms without virtual desktops.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPin;

impl DesktopPin for NoopPin {
    fn pin_to_all_desktops(&self) -> Result<(), PinError> {
        Ok(())
    }
}
