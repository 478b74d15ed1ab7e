//! Overlay window controller.
//!
//! Owns the settings record, the interaction state machine and the fade
//! animation, and carries out the machine's effects on a [`WindowSurface`].
//! Everything runs on the UI thread; `now` is passed in so tests can drive time.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::fade::OpacityAnimator;
use super::geometry::{Bounds, Point};
use super::machine::{CursorGlyph, Effect, OverlayMachine, Presentation};
use super::surface::{apply_click_through, WindowSurface};
use crate::model::theme::{unlocked_highlight, Color, ThemeProbe};
use crate::model::{DesktopInfo, Settings};
use crate::settings::{sync_startup, SettingsStore, StartupRegistration};

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub text: String,
    pub background: Color,
    pub foreground: Color,
    pub font_family: String,
    pub font_size: f32,
    /// Whole-window opacity from the hover fade [0.0, 1.0].
    pub opacity: f64,
}

/// Collaborators the controller talks to besides the window.
pub struct Services {
    pub store: SettingsStore,
    pub startup: Box<dyn StartupRegistration>,
    pub theme: Box<dyn ThemeProbe>,
}

pub struct OverlayController<S: WindowSurface> {
    surface: S,
    services: Services,
    machine: OverlayMachine,
    opacity: OpacityAnimator,
    highlighted: bool,
    settings: Settings,
    preview: Option<Settings>,
    desktop: DesktopInfo,
}

impl<S: WindowSurface> OverlayController<S> {
    pub fn new(surface: S, settings: Settings, services: Services) -> Self {
        Self {
            surface,
            services,
            machine: OverlayMachine::new(),
            opacity: OpacityAnimator::new(1.0),
            highlighted: false,
            settings,
            preview: None,
            desktop: DesktopInfo::default(),
        }
    }

    /// Apply the initial locked state to the freshly created window.
    pub fn start(&mut self, now: Instant) {
        let effects = self.machine.initial_effects();
        self.apply(effects, now);
        // Initial fade-in is not wanted; show at full opacity.
        self.opacity.stop(1.0);
        self.surface.request_redraw();
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Persisted settings (never the live preview).
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn presentation(&self) -> Presentation {
        self.machine.presentation()
    }

    pub fn is_unlocked(&self) -> bool {
        self.machine.is_unlocked()
    }

    pub fn desktop(&self) -> &DesktopInfo {
        &self.desktop
    }

    pub fn theme_probe(&self) -> &dyn ThemeProbe {
        self.services.theme.as_ref()
    }

    /// Control+Shift state from the input poll.
    pub fn on_modifiers(&mut self, held: bool, now: Instant) {
        let effects = self.machine.on_modifiers(held);
        self.apply(effects, now);
    }

    /// Tray lock toggle.
    pub fn toggle_lock(&mut self, now: Instant) {
        let effects = self.machine.toggle_lock();
        self.apply(effects, now);
    }

    /// Cursor position from the input poll.
    pub fn on_pointer(&mut self, cursor: Point, now: Instant) {
        let inside = self.surface.bounds().contains(cursor);
        let effects = self.machine.on_pointer(inside);
        self.apply(effects, now);
    }

    pub fn begin_drag(&mut self, cursor: Point, now: Instant) {
        let bounds = self.surface.bounds();
        let effects = self.machine.begin_drag(cursor, bounds);
        self.apply(effects, now);
    }

    pub fn drag_to(&mut self, cursor: Point, now: Instant) {
        let effects = self.machine.drag_to(cursor);
        self.apply(effects, now);
    }

    pub fn end_drag(&mut self, now: Instant) {
        let effects = self.machine.end_drag();
        self.apply(effects, now);
    }

    pub fn cursor_at(&self, cursor: Point) -> CursorGlyph {
        self.machine.cursor_at(cursor, self.surface.bounds())
    }

    /// Advance the fade. Returns true while a repaint is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let animating = self.opacity.is_animating();
        self.opacity.sample(now);
        if animating {
            self.surface.request_redraw();
        }
        animating
    }

    /// New poll result; repaints when the text changed.
    pub fn set_desktop(&mut self, info: DesktopInfo) {
        if info != self.desktop {
            debug!(name = %info.name, index = info.index, "active desktop changed");
            self.desktop = info;
            self.surface.request_redraw();
        }
    }

    /// Live preview from the settings dialog. Not persisted.
    pub fn preview(&mut self, mut preview: Settings) {
        preview.validate();
        let bounds = self.surface.bounds().with_size(
            preview.window_width.round() as i32,
            preview.window_height.round() as i32,
        );
        self.set_bounds(bounds);
        self.preview = Some(preview);
        self.surface.request_redraw();
    }

    /// Drop the live preview and show the persisted settings again.
    pub fn revert_preview(&mut self) {
        if self.preview.take().is_some() {
            let bounds = self.surface.bounds().with_size(
                self.settings.window_width.round() as i32,
                self.settings.window_height.round() as i32,
            );
            self.set_bounds(bounds);
            self.surface.request_redraw();
        }
    }

    /// Save pressed in the settings dialog.
    ///
    /// The window position is owned by the overlay (it may have been dragged
    /// while the dialog was open), so only the edited fields are taken.
    pub fn commit(&mut self, mut edited: Settings) {
        edited.validate();
        let previous_startup = self.settings.run_at_startup;
        let current = self.surface.bounds();

        edited.window_left = current.x as f64;
        edited.window_top = current.y as f64;
        self.settings = edited;
        self.preview = None;

        let bounds = current.with_size(
            self.settings.window_width.round() as i32,
            self.settings.window_height.round() as i32,
        );
        self.set_bounds(bounds);
        self.save();
        sync_startup(
            previous_startup,
            self.settings.run_at_startup,
            self.services.startup.as_mut(),
        );
        self.surface.request_redraw();
    }

    /// Move to the lower-right default position and persist.
    pub fn reset_position(&mut self, screen_width: f64, screen_height: f64) {
        let bounds = self.surface.bounds();
        self.settings.set_default_position(
            screen_width,
            screen_height,
            bounds.width as f64,
            bounds.height as f64,
        );
        let target = bounds.with_origin(
            self.settings.window_left.round() as i32,
            self.settings.window_top.round() as i32,
        );
        info!(x = target.x, y = target.y, "overlay position reset");
        self.set_bounds(target);
        self.persist_bounds();
    }

    /// What to paint right now.
    pub fn appearance(&self) -> Appearance {
        let shown = self.preview.as_ref().unwrap_or(&self.settings);
        let palette = shown.palette(self.services.theme.as_ref());
        let background = if self.highlighted {
            unlocked_highlight()
        } else {
            palette.background
        };
        Appearance {
            text: self.desktop.name.clone(),
            background,
            foreground: palette.text,
            font_family: shown.font_family.clone(),
            font_size: shown.font_size as f32,
            opacity: self.opacity.value(),
        }
    }

    fn apply(&mut self, effects: Vec<Effect>, now: Instant) {
        for effect in effects {
            match effect {
                Effect::SetClickThrough(enabled) => {
                    apply_click_through(&mut self.surface, enabled);
                }
                Effect::SetCursor(glyph) => self.surface.set_cursor(glyph),
                Effect::FadeTo { opacity, duration } => {
                    self.opacity.fade_to(opacity, duration, now);
                    self.surface.request_redraw();
                }
                Effect::SnapOpacity(opacity) => {
                    self.opacity.stop(opacity);
                    self.surface.request_redraw();
                }
                Effect::Highlight(on) => {
                    if self.highlighted != on {
                        self.highlighted = on;
                        self.surface.request_redraw();
                    }
                }
                Effect::CaptureMouse(capture) => self.surface.capture_mouse(capture),
                Effect::MoveTo(bounds) => self.set_bounds(bounds),
                Effect::PersistBounds => self.persist_bounds(),
            }
        }
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        if let Err(e) = self.surface.set_bounds(bounds) {
            warn!(error = %e, "moving overlay failed");
        }
    }

    /// Store the window rectangle. While a preview is shown the on-screen
    /// size is the unsaved one, so only the origin is taken.
    fn persist_bounds(&mut self) {
        let bounds = self.surface.bounds();
        if self.preview.is_some() {
            self.settings.window_left = bounds.x as f64;
            self.settings.window_top = bounds.y as f64;
        } else {
            self.settings.set_bounds(bounds);
        }
        debug!(?bounds, "persisting overlay bounds");
        self.save();
    }

    fn save(&self) {
        if let Err(e) = self.services.store.save(&self.settings) {
            warn!(error = %e, "saving settings failed");
        }
    }
}
