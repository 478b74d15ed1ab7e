//! Field model behind the settings dialog.
//!
//! Holds the raw control values (text for the integer boxes) so the Win32
//! dialog only has to copy strings in and out. Previews clamp and fall back
//! to the stored values; saving validates and reports the first bad field.

use thiserror::Error;

use crate::model::constants::*;
use crate::model::settings::{clamp_font_size, clamp_height, clamp_width};
use crate::model::{Settings, Theme};

/// Validation failures shown to the user when saving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Invalid font size.")]
    FontSize,

    #[error("Invalid width value.")]
    Width,

    #[error("Invalid height value.")]
    Height,
}

/// Integer fields with up/down buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    FontSize,
    Width,
    Height,
}

impl NumericField {
    pub fn range(self) -> (i32, i32) {
        match self {
            NumericField::FontSize => (MIN_FONT_SIZE, MAX_FONT_SIZE),
            NumericField::Width => (MIN_WIDTH, MAX_WIDTH),
            NumericField::Height => (MIN_HEIGHT, MAX_HEIGHT),
        }
    }
}

/// Current state of every control in the dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    base: Settings,
    pub theme: Theme,
    /// Opacity slider position (0..=100).
    pub opacity_pct: u32,
    pub font_size: String,
    pub font_family: String,
    pub width: String,
    pub height: String,
    pub acrylic: bool,
    pub run_at_startup: bool,
}

impl SettingsForm {
    /// Fill the controls from the persisted record.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base: settings.clone(),
            theme: settings.theme,
            opacity_pct: settings.opacity_percent(),
            font_size: settings.font_size.to_string(),
            font_family: settings.font_family.clone(),
            width: (settings.window_width.round() as i32).to_string(),
            height: (settings.window_height.round() as i32).to_string(),
            acrylic: settings.acrylic_effect,
            run_at_startup: settings.run_at_startup,
        }
    }

    /// Settings the dialog was opened with.
    pub fn base(&self) -> &Settings {
        &self.base
    }

    pub fn opacity_label(&self) -> String {
        format!("{}%", self.opacity_pct.min(100))
    }

    pub fn text(&self, field: NumericField) -> &str {
        match field {
            NumericField::FontSize => &self.font_size,
            NumericField::Width => &self.width,
            NumericField::Height => &self.height,
        }
    }

    pub fn set_text(&mut self, field: NumericField, text: impl Into<String>) {
        let text = text.into();
        match field {
            NumericField::FontSize => self.font_size = text,
            NumericField::Width => self.width = text,
            NumericField::Height => self.height = text,
        }
    }

    /// Up/down button: step by `delta` and clamp. Unparsable text restarts
    /// from the lower bound.
    pub fn step(&mut self, field: NumericField, delta: i32) -> i32 {
        let (min, max) = field.range();
        let current = parse_int(self.text(field)).unwrap_or(min.max(0));
        let next = current.saturating_add(delta).clamp(min, max);
        self.set_text(field, next.to_string());
        next
    }

    /// Record for the live preview: never fails.
    pub fn preview(&self) -> Settings {
        let width = parse_int(&self.width)
            .map(clamp_width)
            .map(f64::from)
            .unwrap_or(self.base.window_width);
        let height = parse_int(&self.height)
            .map(clamp_height)
            .map(f64::from)
            .unwrap_or(self.base.window_height);
        let font_size = parse_int(&self.font_size)
            .map(clamp_font_size)
            .unwrap_or(self.base.font_size);
        self.build(width, height, font_size)
    }

    /// Record to persist, or the first invalid field.
    pub fn commit(&self) -> Result<Settings, FormError> {
        let font_size = parse_int(&self.font_size).ok_or(FormError::FontSize)?;
        let width = parse_int(&self.width).ok_or(FormError::Width)?;
        let height = parse_int(&self.height).ok_or(FormError::Height)?;
        Ok(self.build(
            clamp_width(width) as f64,
            clamp_height(height) as f64,
            clamp_font_size(font_size),
        ))
    }

    fn build(&self, width: f64, height: f64, font_size: i32) -> Settings {
        let font_family = if self.font_family.trim().is_empty() {
            self.base.font_family.clone()
        } else {
            self.font_family.clone()
        };
        Settings {
            theme: self.theme,
            opacity: self.opacity_pct.min(100) as f64 / 100.0,
            font_size,
            font_family,
            window_width: width,
            window_height: height,
            acrylic_effect: self.acrylic,
            run_at_startup: self.run_at_startup,
            ..self.base.clone()
        }
    }
}

/// Parse a whole number as typed in an integer box.
pub fn parse_int(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok()
}

/// Integer boxes only accept digits.
pub fn is_integer_input(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit())
}

/// Sort and de-duplicate system font names, dropping vertical (`@`) variants.
pub fn normalize_font_list(fonts: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut list: Vec<String> = fonts
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty() && !f.starts_with('@'))
        .collect();
    list.sort_by_key(|f| f.to_lowercase());
    list.dedup();
    list
}

/// Index to select in the font list: the stored family, else Segoe UI, else the first.
pub fn pick_font_index(current: &str, available: &[String]) -> Option<usize> {
    if available.is_empty() {
        return None;
    }
    available
        .iter()
        .position(|f| f == current)
        .or_else(|| available.iter().position(|f| f == DEFAULT_FONT_FAMILY))
        .or(Some(0))
}
