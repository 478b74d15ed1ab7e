//! Tests for the overlay controller against an in-memory window.
//!
//! The fake surface records click-through and bounds the way the real
//! window would; settings go to a temporary directory.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use vdesk_overlay::model::constants::*;
use vdesk_overlay::model::{DesktopInfo, FixedThemeProbe, Settings, Theme};
use vdesk_overlay::overlay::{
    Bounds, CursorGlyph, OverlayController, Point, Presentation, Services, SurfaceError,
    WindowSurface,
};
use vdesk_overlay::settings::{SettingsStore, StartupError, StartupRegistration};

#[derive(Debug, Default)]
struct FakeSurface {
    click_through: bool,
    bounds: Bounds,
    cursor: CursorGlyph,
    captured: bool,
    redraws: usize,
}

impl WindowSurface for FakeSurface {
    fn click_through(&self) -> Option<bool> {
        Some(self.click_through)
    }

    fn set_click_through(&mut self, enabled: bool) -> Result<(), SurfaceError> {
        self.click_through = enabled;
        Ok(())
    }

    fn set_cursor(&mut self, glyph: CursorGlyph) {
        self.cursor = glyph;
    }

    fn capture_mouse(&mut self, capture: bool) {
        self.captured = capture;
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), SurfaceError> {
        self.bounds = bounds;
        Ok(())
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

/// Startup registration whose writes the test can inspect afterwards.
#[derive(Clone, Default)]
struct RecordingStartup(Rc<RefCell<Vec<bool>>>);

impl StartupRegistration for RecordingStartup {
    fn is_enabled(&self) -> bool {
        self.0.borrow().last().copied().unwrap_or(false)
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), StartupError> {
        self.0.borrow_mut().push(enabled);
        Ok(())
    }
}

struct Harness {
    _dir: TempDir,
    store: SettingsStore,
    startup: RecordingStartup,
    controller: OverlayController<FakeSurface>,
    t0: Instant,
}

fn harness_with(settings: Settings, light: Option<bool>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::at(dir.path().join(SETTINGS_FILE_NAME));
    let startup = RecordingStartup::default();
    let surface = FakeSurface {
        bounds: settings.bounds(),
        ..FakeSurface::default()
    };
    let services = Services {
        store: store.clone(),
        startup: Box::new(startup.clone()),
        theme: Box::new(FixedThemeProbe(light)),
    };
    let mut controller = OverlayController::new(surface, settings, services);
    let t0 = Instant::now();
    controller.start(t0);
    Harness {
        _dir: dir,
        store,
        startup,
        controller,
        t0,
    }
}

fn placed() -> Settings {
    Settings {
        window_left: 100.0,
        window_top: 100.0,
        ..Settings::default()
    }
}

fn harness() -> Harness {
    harness_with(placed(), None)
}

// === Lock / unlock ===

#[test]
fn starts_locked_and_click_through() {
    let h = harness();
    assert_eq!(h.controller.presentation(), Presentation::LockedIdle);
    assert!(h.controller.surface().click_through);
    assert_eq!(h.controller.appearance().opacity, 1.0);
}

#[test]
fn modifiers_unlock_and_release_locks_again() {
    let mut h = harness();
    let t = h.t0;

    h.controller.on_modifiers(true, t);
    assert!(h.controller.is_unlocked());
    assert!(!h.controller.surface().click_through);
    assert_eq!(h.controller.surface().cursor, CursorGlyph::SizeAll);

    h.controller.on_modifiers(false, t);
    assert!(!h.controller.is_unlocked());
    assert!(h.controller.surface().click_through);
    assert_eq!(h.controller.surface().cursor, CursorGlyph::Arrow);
}

#[test]
fn tray_unlock_ignores_modifier_release() {
    let mut h = harness();
    let t = h.t0;

    h.controller.toggle_lock(t);
    h.controller.on_modifiers(true, t);
    h.controller.on_modifiers(false, t);
    assert!(h.controller.is_unlocked());

    h.controller.toggle_lock(t);
    assert!(!h.controller.is_unlocked());
    assert!(h.controller.surface().click_through);
}

#[test]
fn unlocked_overlay_is_highlighted_and_opaque() {
    let mut h = harness();
    let t = h.t0;
    let themed = h.controller.appearance().background;

    h.controller.on_modifiers(true, t);
    let appearance = h.controller.appearance();
    assert_ne!(appearance.background, themed);
    assert_eq!(appearance.opacity, 1.0);

    h.controller.on_modifiers(false, t);
    assert_eq!(h.controller.appearance().background, themed);
}

// === Hover fade ===

#[test]
fn hover_fades_out_and_back_in() {
    let mut h = harness();
    let inside = Point::new(150, 120);
    let outside = Point::new(10, 10);

    h.controller.on_pointer(inside, h.t0);
    assert_eq!(h.controller.presentation(), Presentation::LockedHover);
    assert!(h.controller.tick(h.t0 + Duration::from_millis(50)));
    let mid = h.controller.appearance().opacity;
    assert!(mid > 0.0 && mid < 1.0);

    h.controller.tick(h.t0 + FADE_DURATION);
    assert_eq!(h.controller.appearance().opacity, 0.0);
    assert!(!h.controller.tick(h.t0 + FADE_DURATION * 2));

    let back = h.t0 + FADE_DURATION * 3;
    h.controller.on_pointer(outside, back);
    h.controller.tick(back + FADE_DURATION);
    assert_eq!(h.controller.presentation(), Presentation::LockedIdle);
    assert_eq!(h.controller.appearance().opacity, 1.0);
}

#[test]
fn hover_does_not_fade_while_unlocked() {
    let mut h = harness();
    h.controller.on_modifiers(true, h.t0);
    h.controller.on_pointer(Point::new(150, 120), h.t0);
    h.controller.tick(h.t0 + FADE_DURATION);
    assert_eq!(h.controller.presentation(), Presentation::Unlocked);
    assert_eq!(h.controller.appearance().opacity, 1.0);
}

// === Drag and resize ===

#[test]
fn drag_moves_and_persists_on_release() {
    let mut h = harness();
    let t = h.t0;
    h.controller.on_modifiers(true, t);

    h.controller.begin_drag(Point::new(150, 120), t);
    assert!(h.controller.surface().captured);
    h.controller.drag_to(Point::new(250, 170), t);
    assert_eq!(h.controller.surface().bounds, Bounds::new(200, 150, 300, 50));

    h.controller.end_drag(t);
    assert!(!h.controller.surface().captured);
    let saved = h.store.load();
    assert_eq!(saved.window_left, 200.0);
    assert_eq!(saved.window_top, 150.0);
}

#[test]
fn grip_drag_resizes_within_limits() {
    let mut h = harness();
    let t = h.t0;
    h.controller.on_modifiers(true, t);

    // Bottom-right corner of (100, 100, 300, 50)
    let grip = Point::new(398, 148);
    assert_eq!(h.controller.cursor_at(grip), CursorGlyph::ResizeDiagonal);
    h.controller.begin_drag(grip, t);
    h.controller.drag_to(Point::new(grip.x - 1000, grip.y - 1000), t);
    h.controller.end_drag(t);

    assert_eq!(
        h.controller.surface().bounds,
        Bounds::new(100, 100, MIN_WIDTH, MIN_HEIGHT)
    );
    assert_eq!(h.store.load().window_width, MIN_WIDTH as f64);
}

#[test]
fn locked_overlay_cannot_be_dragged() {
    let mut h = harness();
    h.controller.begin_drag(Point::new(150, 120), h.t0);
    h.controller.drag_to(Point::new(400, 400), h.t0);
    assert_eq!(h.controller.surface().bounds, placed().bounds());
    assert!(!h.store.exists());
}

#[test]
fn locking_persists_current_position() {
    let mut h = harness();
    h.controller.on_modifiers(true, h.t0);
    h.controller.on_modifiers(false, h.t0);
    let saved = h.store.load();
    assert_eq!(saved.bounds(), placed().bounds());
}

// === Desktop text ===

#[test]
fn desktop_change_updates_text_and_redraws() {
    let mut h = harness();
    assert_eq!(h.controller.appearance().text, FALLBACK_DESKTOP_NAME);

    let before = h.controller.surface().redraws;
    h.controller.set_desktop(DesktopInfo {
        name: "Work".to_string(),
        index: 2,
    });
    assert_eq!(h.controller.appearance().text, "Work");
    assert_eq!(h.controller.surface().redraws, before + 1);

    h.controller.set_desktop(DesktopInfo {
        name: "Work".to_string(),
        index: 2,
    });
    assert_eq!(h.controller.surface().redraws, before + 1);
}

// === Settings dialog round trips ===

#[test]
fn preview_applies_live_and_cancel_reverts() {
    let mut h = harness();
    let preview = Settings {
        theme: Theme::Light,
        font_size: 30,
        window_width: 500.0,
        ..placed()
    };

    h.controller.preview(preview);
    assert_eq!(h.controller.appearance().font_size, 30.0);
    assert_eq!(h.controller.surface().bounds.width, 500);
    assert!(!h.store.exists());

    h.controller.revert_preview();
    assert_eq!(h.controller.appearance().font_size, DEFAULT_FONT_SIZE as f32);
    assert_eq!(h.controller.surface().bounds, placed().bounds());
}

#[test]
fn reset_during_preview_saves_position_but_not_preview_size() {
    let mut h = harness();
    h.controller.preview(Settings {
        window_width: 500.0,
        ..placed()
    });

    h.controller.reset_position(1920.0, 1080.0);
    let saved = h.store.load();
    assert_eq!(saved.window_width, 300.0);
    assert_eq!(saved.window_left, 1920.0 - 500.0 - DEFAULT_RIGHT_MARGIN);
    assert_eq!(saved.window_top, 1080.0 - 50.0 - DEFAULT_BOTTOM_MARGIN);

    h.controller.revert_preview();
    assert_eq!(h.controller.surface().bounds.width, 300);
    assert_eq!(h.controller.settings().window_width, 300.0);
}

#[test]
fn drag_during_preview_keeps_saved_size() {
    let mut h = harness();
    let t = h.t0;
    h.controller.preview(Settings {
        window_width: 500.0,
        ..placed()
    });

    h.controller.on_modifiers(true, t);
    h.controller.begin_drag(Point::new(150, 120), t);
    h.controller.drag_to(Point::new(160, 130), t);
    h.controller.end_drag(t);
    h.controller.on_modifiers(false, t);

    let saved = h.store.load();
    assert_eq!(saved.bounds(), Bounds::new(110, 110, 300, 50));

    h.controller.revert_preview();
    assert_eq!(h.controller.surface().bounds, Bounds::new(110, 110, 300, 50));
}

#[test]
fn commit_persists_and_keeps_dragged_position() {
    let mut h = harness();
    let t = h.t0;

    // Dialog opened, then the overlay was dragged elsewhere
    let edited = Settings {
        opacity: 0.5,
        window_height: 80.0,
        ..placed()
    };
    h.controller.on_modifiers(true, t);
    h.controller.begin_drag(Point::new(150, 120), t);
    h.controller.drag_to(Point::new(160, 130), t);
    h.controller.end_drag(t);
    h.controller.on_modifiers(false, t);

    h.controller.commit(edited);
    let saved = h.store.load();
    assert_eq!(saved.opacity, 0.5);
    assert_eq!(saved.opacity_label(), "50%");
    assert_eq!(saved.window_left, 110.0);
    assert_eq!(saved.window_top, 110.0);
    assert_eq!(h.controller.surface().bounds, Bounds::new(110, 110, 300, 80));
}

#[test]
fn commit_clamps_out_of_range_values() {
    let mut h = harness();
    h.controller.commit(Settings {
        window_width: 10_000.0,
        font_size: 1,
        ..placed()
    });
    let saved = h.store.load();
    assert_eq!(saved.window_width, MAX_WIDTH as f64);
    assert_eq!(saved.font_size, MIN_FONT_SIZE);
}

#[test]
fn startup_entry_written_only_when_flag_changes() {
    let mut h = harness();
    h.controller.commit(placed());
    assert!(h.startup.0.borrow().is_empty());

    h.controller.commit(Settings {
        run_at_startup: true,
        ..placed()
    });
    h.controller.commit(Settings {
        run_at_startup: true,
        ..placed()
    });
    assert_eq!(*h.startup.0.borrow(), vec![true]);
}

#[test]
fn reset_position_moves_to_lower_right_and_saves() {
    let mut h = harness();
    h.controller.reset_position(1920.0, 1080.0);

    let expected = Bounds::new(
        1920 - 300 - DEFAULT_RIGHT_MARGIN as i32,
        1080 - 50 - DEFAULT_BOTTOM_MARGIN as i32,
        300,
        50,
    );
    assert_eq!(h.controller.surface().bounds, expected);
    assert_eq!(h.store.load().bounds(), expected);
}

// === Theme ===

#[test]
fn auto_theme_follows_system_preference() {
    let auto = || Settings {
        theme: Theme::Auto,
        ..placed()
    };
    let light = harness_with(auto(), Some(true));
    let dark = harness_with(auto(), Some(false));
    let unknown = harness_with(auto(), None);

    assert_eq!(light.controller.appearance().foreground.r, 0);
    assert_eq!(dark.controller.appearance().foreground.r, 255);
    assert_eq!(unknown.controller.appearance().foreground.r, 255);
}

#[test]
fn background_alpha_tracks_opacity_setting() {
    let h = harness_with(
        Settings {
            opacity: 0.5,
            theme: Theme::Dark,
            ..placed()
        },
        None,
    );
    assert_eq!(h.controller.appearance().background.a, 127);
}
