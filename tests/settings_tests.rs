//! Tests for the settings file and the settings dialog's field model.

use std::fs;

use vdesk_overlay::model::constants::*;
use vdesk_overlay::model::{Settings, Theme};
use vdesk_overlay::settings::{FormError, NumericField, SettingsForm, SettingsStore};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// === Settings file ===

fn valid_records() -> Vec<Settings> {
    let typical = Settings {
        window_left: 1580.0,
        window_top: 970.0,
        window_width: 420.0,
        window_height: 64.0,
        theme: Theme::Auto,
        opacity: 0.5,
        font_size: 24,
        font_family: "Consolas".to_string(),
        acrylic_effect: true,
        run_at_startup: true,
    };
    let mut records = vec![
        typical.clone(),
        Settings::default(),
        Settings {
            window_width: MIN_WIDTH as f64,
            window_height: MIN_HEIGHT as f64,
            font_size: MIN_FONT_SIZE,
            opacity: 0.0,
            ..typical.clone()
        },
        Settings {
            window_width: MAX_WIDTH as f64,
            window_height: MAX_HEIGHT as f64,
            font_size: MAX_FONT_SIZE,
            opacity: 1.0,
            ..typical.clone()
        },
        // Secondary monitor left of the primary one
        Settings {
            window_left: -1250.5,
            window_top: 12.25,
            ..typical.clone()
        },
        Settings {
            font_family: "游ゴシック Ärger".to_string(),
            ..typical.clone()
        },
    ];
    records.extend(Theme::ALL.iter().map(|&theme| Settings {
        theme,
        ..typical.clone()
    }));
    records
}

#[test]
fn saved_settings_load_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::at(dir.path().join(SETTINGS_FILE_NAME));
    for settings in valid_records() {
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }
}

#[test]
fn file_uses_pascal_case_keys_and_theme_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::at(dir.path().join(SETTINGS_FILE_NAME));
    store
        .save(&Settings {
            theme: Theme::Light,
            ..Settings::default()
        })
        .unwrap();

    let json = fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["Theme"], "Light");
    assert_eq!(value["FontFamily"], DEFAULT_FONT_FAMILY);
    assert!(value.get("WindowLeft").is_some());
    assert!(value.get("RunAtStartup").is_some());
}

#[test]
fn missing_keys_take_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    fs::write(&path, r#"{ "Theme": "Light", "FontSize": 20 }"#).unwrap();

    let s = SettingsStore::at(&path).load();
    assert_eq!(s.theme, Theme::Light);
    assert_eq!(s.font_size, 20);
    assert!(approx_eq(s.window_width, DEFAULT_WIDTH));
    assert!(approx_eq(s.opacity, DEFAULT_OPACITY));
    assert!(s.needs_default_position());
}

#[test]
fn unknown_theme_name_means_auto() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    fs::write(&path, r#"{ "Theme": "Sepia" }"#).unwrap();
    assert_eq!(SettingsStore::at(&path).load().theme, Theme::Auto);
}

#[test]
fn portable_file_beside_executable_wins() {
    let exe_dir = tempfile::tempdir().unwrap();
    let app_data = tempfile::tempdir().unwrap();

    let store = SettingsStore::locate_in(Some(exe_dir.path()), Some(app_data.path()));
    assert_eq!(store.path(), app_data.path().join(SETTINGS_FILE_NAME));

    fs::write(exe_dir.path().join(SETTINGS_FILE_NAME), "{}").unwrap();
    let store = SettingsStore::locate_in(Some(exe_dir.path()), Some(app_data.path()));
    assert_eq!(store.path(), exe_dir.path().join(SETTINGS_FILE_NAME));
}

#[test]
fn default_position_is_lower_right_above_taskbar() {
    let mut s = Settings::default();
    assert!(s.needs_default_position());
    s.set_default_position(1920.0, 1080.0, s.window_width, s.window_height);
    assert!(approx_eq(s.window_left, 1920.0 - DEFAULT_WIDTH - DEFAULT_RIGHT_MARGIN));
    assert!(approx_eq(s.window_top, 1080.0 - DEFAULT_HEIGHT - DEFAULT_BOTTOM_MARGIN));
    assert!(!s.needs_default_position());
}

// === Dialog form ===

#[test]
fn slider_at_fifty_saves_half_opacity() {
    let mut form = SettingsForm::from_settings(&Settings::default());
    form.opacity_pct = 50;
    assert_eq!(form.opacity_label(), "50%");

    let saved = form.commit().unwrap();
    assert!(approx_eq(saved.opacity, 0.5));
    assert_eq!(saved.opacity_label(), "50%");
}

#[test]
fn save_rejects_empty_boxes_in_field_order() {
    let mut form = SettingsForm::from_settings(&Settings::default());
    form.set_text(NumericField::Height, "");
    assert_eq!(form.commit(), Err(FormError::Height));

    form.set_text(NumericField::FontSize, "");
    assert_eq!(form.commit(), Err(FormError::FontSize));
    assert_eq!(FormError::FontSize.to_string(), "Invalid font size.");
}

#[test]
fn save_clamps_instead_of_rejecting_out_of_range() {
    let mut form = SettingsForm::from_settings(&Settings::default());
    form.set_text(NumericField::Width, "5");
    form.set_text(NumericField::FontSize, "900");

    let saved = form.commit().unwrap();
    assert!(approx_eq(saved.window_width, MIN_WIDTH as f64));
    assert_eq!(saved.font_size, MAX_FONT_SIZE);
}

#[test]
fn preview_never_fails_on_half_typed_values() {
    let base = Settings {
        window_width: 320.0,
        ..Settings::default()
    };
    let mut form = SettingsForm::from_settings(&base);
    form.set_text(NumericField::Width, "");
    form.theme = Theme::Light;

    let preview = form.preview();
    assert!(approx_eq(preview.window_width, 320.0));
    assert_eq!(preview.theme, Theme::Light);
}

#[test]
fn stepping_stays_within_limits() {
    let mut form = SettingsForm::from_settings(&Settings::default());
    form.set_text(NumericField::Height, MAX_HEIGHT.to_string());
    assert_eq!(form.step(NumericField::Height, 1), MAX_HEIGHT);
    assert_eq!(form.step(NumericField::Height, -1), MAX_HEIGHT - 1);
    assert_eq!(form.text(NumericField::Height), (MAX_HEIGHT - 1).to_string());
}
