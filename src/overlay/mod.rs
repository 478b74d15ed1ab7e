//! Overlay window behaviour, independent of Win32.
//!
//! - [`machine`]: lock / hover / drag state machine producing effects
//! - [`fade`]: eased opacity animation
//! - [`surface`]: traits for the native window and desktop pinning
//! - [`controller`]: glues the above to the settings store

pub mod controller;
pub mod fade;
pub mod geometry;
pub mod machine;
pub mod surface;

pub use controller::{Appearance, OverlayController, Services};
pub use fade::{ease_in_out_quad, OpacityAnimator};
pub use geometry::{Bounds, Point};
pub use machine::{CursorGlyph, DragKind, Effect, OverlayMachine, Presentation, UnlockSource};
pub use surface::{apply_click_through, DesktopPin, NoopPin, PinError, SurfaceError, WindowSurface};
