//! Lock / hover / drag state machine of the overlay window.
//!
//! The machine is pure: every input returns the list of [`Effect`]s the
//! window host has to carry out. States:
//!
//! ```text
//!            pointer enters                 Ctrl+Shift held / tray
//! LockedIdle ───────────────► LockedHover   ───────────────────────► Unlocked
//!     ▲      ◄───────────────      │                                    │
//!     │        pointer leaves      └──────── Ctrl+Shift held / tray ────┤
//!     └──────────────── released / tray (persist bounds) ◄──────────────┘
//! ```

use super::geometry::{Bounds, Point};
use crate::model::constants::{FADE_DURATION, MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH, RESIZE_GRIP};
use std::time::Duration;

/// Live presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    LockedIdle,
    LockedHover,
    Unlocked,
}

/// What unlocked the overlay; decides what may lock it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockSource {
    /// Control+Shift held; released modifiers lock again.
    Modifiers,
    /// Tray menu toggle; only the tray locks again.
    Tray,
}

/// Cursor shown over the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorGlyph {
    #[default]
    Arrow,
    SizeAll,
    ResizeDiagonal,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    SetClickThrough(bool),
    SetCursor(CursorGlyph),
    FadeTo { opacity: f64, duration: Duration },
    /// Cancel any running fade and show `opacity` immediately.
    SnapOpacity(f64),
    /// Paint the unlocked accent instead of the themed background.
    Highlight(bool),
    /// Capture the mouse for a drag session (`true`) or release it.
    CaptureMouse(bool),
    MoveTo(Bounds),
    PersistBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragSession {
    kind: DragKind,
    anchor: Point,
    origin: Bounds,
}

/// The overlay's interaction state.
#[derive(Debug, Clone, Default)]
pub struct OverlayMachine {
    unlocked: Option<UnlockSource>,
    hovering: bool,
    drag: Option<DragSession>,
}

impl OverlayMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presentation(&self) -> Presentation {
        match (self.unlocked, self.hovering) {
            (Some(_), _) => Presentation::Unlocked,
            (None, true) => Presentation::LockedHover,
            (None, false) => Presentation::LockedIdle,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.is_some()
    }

    pub fn unlock_source(&self) -> Option<UnlockSource> {
        self.unlocked
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_kind(&self) -> Option<DragKind> {
        self.drag.map(|d| d.kind)
    }

    /// Effects that bring a freshly created window in line with the machine.
    pub fn initial_effects(&self) -> Vec<Effect> {
        let mut effects = vec![Effect::SetClickThrough(!self.is_unlocked())];
        effects.extend(self.appearance_effects());
        effects
    }

    /// Feed the current Control+Shift state (polled every input tick).
    pub fn on_modifiers(&mut self, held: bool) -> Vec<Effect> {
        match (held, self.unlocked) {
            (true, None) => self.enter_unlocked(UnlockSource::Modifiers),
            (false, Some(UnlockSource::Modifiers)) => self.leave_unlocked(),
            _ => Vec::new(),
        }
    }

    /// Tray "Unlock/Lock overlay" item.
    pub fn toggle_lock(&mut self) -> Vec<Effect> {
        if self.is_unlocked() {
            self.leave_unlocked()
        } else {
            self.enter_unlocked(UnlockSource::Tray)
        }
    }

    /// Feed the polled hover test. Ignored while unlocked.
    pub fn on_pointer(&mut self, inside: bool) -> Vec<Effect> {
        if self.is_unlocked() || inside == self.hovering {
            return Vec::new();
        }
        self.hovering = inside;
        self.appearance_effects()
    }

    /// Cursor to show at `cursor` given the current window rectangle.
    pub fn cursor_at(&self, cursor: Point, bounds: Bounds) -> CursorGlyph {
        match self.drag {
            Some(DragSession {
                kind: DragKind::Resize,
                ..
            }) => CursorGlyph::ResizeDiagonal,
            Some(_) => CursorGlyph::SizeAll,
            None if !self.is_unlocked() => CursorGlyph::Arrow,
            None if bounds.in_resize_grip(cursor, RESIZE_GRIP) => CursorGlyph::ResizeDiagonal,
            None => CursorGlyph::SizeAll,
        }
    }

    /// Left button pressed at `cursor` inside the window.
    pub fn begin_drag(&mut self, cursor: Point, bounds: Bounds) -> Vec<Effect> {
        if !self.is_unlocked() || self.drag.is_some() {
            return Vec::new();
        }
        let kind = if bounds.in_resize_grip(cursor, RESIZE_GRIP) {
            DragKind::Resize
        } else {
            DragKind::Move
        };
        self.drag = Some(DragSession {
            kind,
            anchor: cursor,
            origin: bounds,
        });
        vec![
            Effect::CaptureMouse(true),
            Effect::SetCursor(self.cursor_at(cursor, bounds)),
        ]
    }

    /// Mouse moved to `cursor` while the button is down.
    pub fn drag_to(&mut self, cursor: Point) -> Vec<Effect> {
        let Some(session) = self.drag else {
            return Vec::new();
        };
        let dx = cursor.x - session.anchor.x;
        let dy = cursor.y - session.anchor.y;
        let origin = session.origin;
        let next = match session.kind {
            DragKind::Move => origin.with_origin(origin.x + dx, origin.y + dy),
            DragKind::Resize => origin.with_size(
                (origin.width + dx).clamp(MIN_WIDTH, MAX_WIDTH),
                (origin.height + dy).clamp(MIN_HEIGHT, MAX_HEIGHT),
            ),
        };
        vec![Effect::MoveTo(next)]
    }

    /// Left button released.
    pub fn end_drag(&mut self) -> Vec<Effect> {
        if self.drag.take().is_none() {
            return Vec::new();
        }
        vec![Effect::CaptureMouse(false), Effect::PersistBounds]
    }

    fn enter_unlocked(&mut self, source: UnlockSource) -> Vec<Effect> {
        self.unlocked = Some(source);
        let mut effects = vec![
            Effect::SetClickThrough(false),
            Effect::SetCursor(CursorGlyph::SizeAll),
        ];
        effects.extend(self.appearance_effects());
        effects
    }

    fn leave_unlocked(&mut self) -> Vec<Effect> {
        self.unlocked = None;
        // Hover is unknown until the next poll; start from idle.
        self.hovering = false;
        let mut effects = Vec::new();
        if self.drag.take().is_some() {
            effects.push(Effect::CaptureMouse(false));
        }
        effects.push(Effect::SetClickThrough(true));
        effects.push(Effect::SetCursor(CursorGlyph::Arrow));
        effects.extend(self.appearance_effects());
        effects.push(Effect::PersistBounds);
        effects
    }

    fn appearance_effects(&self) -> Vec<Effect> {
        match self.presentation() {
            Presentation::Unlocked => vec![Effect::SnapOpacity(1.0), Effect::Highlight(true)],
            Presentation::LockedHover => vec![Effect::FadeTo {
                opacity: 0.0,
                duration: FADE_DURATION,
            }],
            Presentation::LockedIdle => vec![
                Effect::Highlight(false),
                Effect::FadeTo {
                    opacity: 1.0,
                    duration: FADE_DURATION,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(100, 100, 300, 50)
    }

    #[test]
    fn starts_locked_idle() {
        let m = OverlayMachine::new();
        assert_eq!(m.presentation(), Presentation::LockedIdle);
        assert!(m.initial_effects().contains(&Effect::SetClickThrough(true)));
    }

    #[test]
    fn modifiers_unlock_and_disable_click_through() {
        let mut m = OverlayMachine::new();
        let fx = m.on_modifiers(true);
        assert_eq!(m.presentation(), Presentation::Unlocked);
        assert!(fx.contains(&Effect::SetClickThrough(false)));
        assert!(fx.contains(&Effect::Highlight(true)));
        assert!(fx.contains(&Effect::SnapOpacity(1.0)));
    }

    #[test]
    fn holding_modifiers_is_idempotent() {
        let mut m = OverlayMachine::new();
        m.on_modifiers(true);
        assert!(m.on_modifiers(true).is_empty());
    }

    #[test]
    fn release_locks_and_persists() {
        let mut m = OverlayMachine::new();
        m.on_modifiers(true);
        let fx = m.on_modifiers(false);
        assert_eq!(m.presentation(), Presentation::LockedIdle);
        assert!(fx.contains(&Effect::SetClickThrough(true)));
        assert!(fx.contains(&Effect::PersistBounds));
        assert!(fx.contains(&Effect::Highlight(false)));
    }

    #[test]
    fn hover_fades_out_and_back() {
        let mut m = OverlayMachine::new();
        let fx = m.on_pointer(true);
        assert_eq!(m.presentation(), Presentation::LockedHover);
        assert_eq!(
            fx,
            vec![Effect::FadeTo {
                opacity: 0.0,
                duration: FADE_DURATION
            }]
        );
        assert!(m.on_pointer(true).is_empty());

        let fx = m.on_pointer(false);
        assert_eq!(m.presentation(), Presentation::LockedIdle);
        assert!(fx.contains(&Effect::FadeTo {
            opacity: 1.0,
            duration: FADE_DURATION
        }));
    }

    #[test]
    fn hover_is_ignored_while_unlocked() {
        let mut m = OverlayMachine::new();
        m.on_modifiers(true);
        assert!(m.on_pointer(true).is_empty());
        assert_eq!(m.presentation(), Presentation::Unlocked);
    }

    #[test]
    fn leaving_unlocked_re_evaluates_hover() {
        let mut m = OverlayMachine::new();
        m.on_pointer(true);
        m.on_modifiers(true);
        m.on_modifiers(false);
        assert_eq!(m.presentation(), Presentation::LockedIdle);
        // Next poll with the pointer still inside goes back to hover.
        assert!(!m.on_pointer(true).is_empty());
        assert_eq!(m.presentation(), Presentation::LockedHover);
    }

    #[test]
    fn tray_unlock_survives_modifier_release() {
        let mut m = OverlayMachine::new();
        m.toggle_lock();
        assert_eq!(m.unlock_source(), Some(UnlockSource::Tray));
        assert!(m.on_modifiers(false).is_empty());
        assert!(m.is_unlocked());
        let fx = m.toggle_lock();
        assert!(!m.is_unlocked());
        assert!(fx.contains(&Effect::PersistBounds));
    }

    #[test]
    fn drag_moves_window() {
        let mut m = OverlayMachine::new();
        m.on_modifiers(true);
        let fx = m.begin_drag(Point::new(150, 110), bounds());
        assert!(fx.contains(&Effect::CaptureMouse(true)));
        assert_eq!(m.drag_kind(), Some(DragKind::Move));
        assert_eq!(
            m.drag_to(Point::new(170, 90)),
            vec![Effect::MoveTo(Bounds::new(120, 80, 300, 50))]
        );
        let fx = m.end_drag();
        assert_eq!(fx, vec![Effect::CaptureMouse(false), Effect::PersistBounds]);
    }

    #[test]
    fn drag_from_grip_resizes_with_clamping() {
        let mut m = OverlayMachine::new();
        m.on_modifiers(true);
        m.begin_drag(Point::new(398, 148), bounds());
        assert_eq!(m.drag_kind(), Some(DragKind::Resize));
        assert_eq!(
            m.drag_to(Point::new(418, 158)),
            vec![Effect::MoveTo(Bounds::new(100, 100, 320, 60))]
        );
        assert_eq!(
            m.drag_to(Point::new(0, 0)),
            vec![Effect::MoveTo(Bounds::new(100, 100, MIN_WIDTH, MIN_HEIGHT))]
        );
    }

    #[test]
    fn drag_requires_unlock() {
        let mut m = OverlayMachine::new();
        assert!(m.begin_drag(Point::new(150, 110), bounds()).is_empty());
        assert!(m.drag_to(Point::new(0, 0)).is_empty());
        assert!(m.end_drag().is_empty());
    }

    #[test]
    fn locking_mid_drag_releases_capture() {
        let mut m = OverlayMachine::new();
        m.on_modifiers(true);
        m.begin_drag(Point::new(150, 110), bounds());
        let fx = m.on_modifiers(false);
        assert!(!m.is_dragging());
        assert!(fx.contains(&Effect::CaptureMouse(false)));
        assert!(fx.contains(&Effect::PersistBounds));
    }

    #[test]
    fn cursor_glyphs() {
        let mut m = OverlayMachine::new();
        assert_eq!(m.cursor_at(Point::new(150, 110), bounds()), CursorGlyph::Arrow);
        m.on_modifiers(true);
        assert_eq!(m.cursor_at(Point::new(150, 110), bounds()), CursorGlyph::SizeAll);
        assert_eq!(
            m.cursor_at(Point::new(399, 149), bounds()),
            CursorGlyph::ResizeDiagonal
        );
    }
}
