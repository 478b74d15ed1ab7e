//! Persisted settings record (pure Rust, no FFI).
//!
//! The same struct is used for live previews coming from the settings
//! dialog; previews simply never reach the store.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::theme::{EffectiveTheme, Palette, Theme, ThemeProbe};
use crate::clamp;
use crate::overlay::Bounds;

/// Complete settings record, serialized as `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    /// Overlay left edge in screen pixels (0 together with `window_top` = not placed yet).
    pub window_left: f64,
    /// Overlay top edge in screen pixels.
    pub window_top: f64,
    pub window_width: f64,
    pub window_height: f64,
    pub theme: Theme,
    /// Background opacity [0.0, 1.0].
    pub opacity: f64,
    pub font_size: i32,
    pub font_family: String,
    pub acrylic_effect: bool,
    pub run_at_startup: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_left: 0.0,
            window_top: 0.0,
            window_width: DEFAULT_WIDTH,
            window_height: DEFAULT_HEIGHT,
            theme: Theme::default(),
            opacity: DEFAULT_OPACITY,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            acrylic_effect: false,
            run_at_startup: false,
        }
    }
}

/// Clamp a width into [`MIN_WIDTH`, `MAX_WIDTH`].
pub fn clamp_width(w: i32) -> i32 {
    w.clamp(MIN_WIDTH, MAX_WIDTH)
}

/// Clamp a height into [`MIN_HEIGHT`, `MAX_HEIGHT`].
pub fn clamp_height(h: i32) -> i32 {
    h.clamp(MIN_HEIGHT, MAX_HEIGHT)
}

/// Clamp a font size into [`MIN_FONT_SIZE`, `MAX_FONT_SIZE`].
pub fn clamp_font_size(fs: i32) -> i32 {
    fs.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

impl Settings {
    /// Validates and clamps all values to valid ranges.
    pub fn validate(&mut self) {
        self.window_width = clamp_dimension(self.window_width, MIN_WIDTH, MAX_WIDTH, DEFAULT_WIDTH);
        self.window_height =
            clamp_dimension(self.window_height, MIN_HEIGHT, MAX_HEIGHT, DEFAULT_HEIGHT);
        self.font_size = clamp_font_size(self.font_size);
        self.opacity = if self.opacity.is_finite() {
            clamp(self.opacity, MIN_OPACITY, MAX_OPACITY)
        } else {
            DEFAULT_OPACITY
        };
        if !self.window_left.is_finite() {
            self.window_left = 0.0;
        }
        if !self.window_top.is_finite() {
            self.window_top = 0.0;
        }
        if self.font_family.trim().is_empty() {
            self.font_family = DEFAULT_FONT_FAMILY.to_string();
        }
    }

    /// True until the overlay has been placed once.
    pub fn needs_default_position(&self) -> bool {
        self.window_left == 0.0 && self.window_top == 0.0
    }

    /// Place the overlay in the lower-right corner, above the taskbar.
    pub fn set_default_position(
        &mut self,
        screen_width: f64,
        screen_height: f64,
        window_width: f64,
        window_height: f64,
    ) {
        self.window_left = screen_width - window_width - DEFAULT_RIGHT_MARGIN;
        self.window_top = screen_height - window_height - DEFAULT_BOTTOM_MARGIN;
    }

    /// Stored window rectangle, rounded to whole pixels.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.window_left.round() as i32,
            self.window_top.round() as i32,
            self.window_width.round() as i32,
            self.window_height.round() as i32,
        )
    }

    /// Record the current window rectangle.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.window_left = bounds.x as f64;
        self.window_top = bounds.y as f64;
        self.window_width = bounds.width as f64;
        self.window_height = bounds.height as f64;
    }

    /// Opacity as the settings dialog's slider value (0..=100).
    pub fn opacity_percent(&self) -> u32 {
        (clamp(self.opacity, MIN_OPACITY, MAX_OPACITY) * 100.0).round() as u32
    }

    /// Label next to the opacity slider, e.g. `"50%"`.
    pub fn opacity_label(&self) -> String {
        format!("{}%", self.opacity_percent())
    }

    pub fn effective_theme(&self, probe: &dyn ThemeProbe) -> EffectiveTheme {
        self.theme.resolve(probe)
    }

    pub fn palette(&self, probe: &dyn ThemeProbe) -> Palette {
        self.effective_theme(probe).palette(self.opacity)
    }
}

fn clamp_dimension(v: f64, lo: i32, hi: i32, fallback: f64) -> f64 {
    if v.is_finite() {
        clamp(v, lo as f64, hi as f64)
    } else {
        fallback
    }
}
