//! Theme choice and palette resolution.

use serde::{Deserialize, Serialize};

use super::constants::UNLOCKED_HIGHLIGHT;

/// Theme stored in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    /// Follow the system light/dark preference.
    Auto,
}

/// A theme after `Auto` has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectiveTheme {
    Light,
    Dark,
}

/// Straight (non-premultiplied) 8-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Normalised components for Direct2D.
    pub fn to_f32(self) -> (f32, f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }
}

/// Background and text colors of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
}

impl Theme {
    /// All choices in settings-dialog order (combo index 0, 1, 2).
    pub const ALL: [Theme; 3] = [Theme::Auto, Theme::Dark, Theme::Light];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Auto => "Auto",
        }
    }

    /// Parse a stored theme string. Unknown values fall back to `Auto`.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            t if t.eq_ignore_ascii_case("light") => Theme::Light,
            t if t.eq_ignore_ascii_case("dark") => Theme::Dark,
            _ => Theme::Auto,
        }
    }

    /// Position in the settings dialog's theme combo box.
    pub fn index(self) -> usize {
        match self {
            Theme::Auto => 0,
            Theme::Dark => 1,
            Theme::Light => 2,
        }
    }

    /// Inverse of [`Theme::index`]; out-of-range indices mean `Auto`.
    pub fn from_index(index: usize) -> Self {
        Theme::ALL.get(index).copied().unwrap_or(Theme::Auto)
    }

    /// Resolve against the system preference read at call time.
    pub fn resolve(self, probe: &dyn ThemeProbe) -> EffectiveTheme {
        match self {
            Theme::Light => EffectiveTheme::Light,
            Theme::Dark => EffectiveTheme::Dark,
            Theme::Auto => {
                if probe.system_prefers_light() == Some(true) {
                    EffectiveTheme::Light
                } else {
                    EffectiveTheme::Dark
                }
            }
        }
    }
}

impl From<String> for Theme {
    fn from(s: String) -> Self {
        Theme::parse(&s)
    }
}

impl From<Theme> for &'static str {
    fn from(theme: Theme) -> Self {
        theme.as_str()
    }
}

impl EffectiveTheme {
    /// Overlay palette with the background alpha taken from `opacity`.
    pub fn palette(self, opacity: f64) -> Palette {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
        match self {
            EffectiveTheme::Light => Palette {
                background: Color::rgba(240, 240, 240, alpha),
                text: Color::rgb(0, 0, 0),
            },
            EffectiveTheme::Dark => Palette {
                background: Color::rgba(0, 0, 0, alpha),
                text: Color::rgb(255, 255, 255),
            },
        }
    }

    pub fn is_light(self) -> bool {
        self == EffectiveTheme::Light
    }
}

/// Accent background used while the overlay is unlocked.
pub fn unlocked_highlight() -> Color {
    let (a, r, g, b) = UNLOCKED_HIGHLIGHT;
    Color::rgba(r, g, b, a)
}

/// Read-only access to the system light/dark preference.
pub trait ThemeProbe {
    /// `Some(true)` when apps should use the light theme, `None` if unreadable.
    fn system_prefers_light(&self) -> Option<bool>;
}

/// Probe returning a fixed answer; used off-Windows and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedThemeProbe(pub Option<bool>);

impl ThemeProbe for FixedThemeProbe {
    fn system_prefers_light(&self) -> Option<bool> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_follows_system_flag() {
        assert_eq!(
            Theme::Auto.resolve(&FixedThemeProbe(Some(true))),
            EffectiveTheme::Light
        );
        assert_eq!(
            Theme::Auto.resolve(&FixedThemeProbe(Some(false))),
            EffectiveTheme::Dark
        );
    }

    #[test]
    fn auto_is_dark_when_flag_unreadable() {
        assert_eq!(Theme::Auto.resolve(&FixedThemeProbe(None)), EffectiveTheme::Dark);
    }

    #[test]
    fn explicit_themes_ignore_system() {
        let light_system = FixedThemeProbe(Some(true));
        assert_eq!(Theme::Dark.resolve(&light_system), EffectiveTheme::Dark);
        assert_eq!(Theme::Light.resolve(&FixedThemeProbe(Some(false))), EffectiveTheme::Light);
    }

    #[test]
    fn combo_index_roundtrip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_index(theme.index()), theme);
        }
        assert_eq!(Theme::from_index(7), Theme::Auto);
    }

    #[test]
    fn unknown_strings_parse_as_auto() {
        assert_eq!(Theme::parse("Solarized"), Theme::Auto);
        assert_eq!(Theme::parse("light"), Theme::Light);
        assert_eq!(Theme::parse(" Dark "), Theme::Dark);
    }

    #[test]
    fn palette_alpha_tracks_opacity() {
        let p = EffectiveTheme::Dark.palette(0.5);
        assert_eq!(p.background, Color::rgba(0, 0, 0, 127));
        assert_eq!(p.text, Color::rgb(255, 255, 255));

        let p = EffectiveTheme::Light.palette(1.0);
        assert_eq!(p.background.a, 255);
        assert_eq!(p.text, Color::rgb(0, 0, 0));
    }
}
