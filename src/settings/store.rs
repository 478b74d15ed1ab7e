//! JSON settings file.
//!
//! Looks for `settings.json` beside the executable first (portable
//! installs), then falls back to `<config dir>/VirtualDesktopOverlay/settings.json`.
//! Loading never fails: a missing or corrupt file yields defaults.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::constants::{APP_NAME, SETTINGS_FILE_NAME};
use crate::model::Settings;

/// Errors while writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to create settings directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write settings to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-user application data directory, e.g. `%APPDATA%\VirtualDesktopOverlay`.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Directory holding the running executable.
fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Location of the settings file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the settings file for this installation.
    pub fn locate() -> Self {
        Self::locate_in(exe_dir().as_deref(), app_data_dir().as_deref())
    }

    /// Executable-adjacent file wins if it exists; app-data otherwise.
    pub fn locate_in(exe_dir: Option<&Path>, app_data: Option<&Path>) -> Self {
        if let Some(dir) = exe_dir {
            let portable = dir.join(SETTINGS_FILE_NAME);
            if portable.is_file() {
                return Self::at(portable);
            }
        }
        match (app_data, exe_dir) {
            (Some(dir), _) => Self::at(dir.join(SETTINGS_FILE_NAME)),
            (None, Some(dir)) => Self::at(dir.join(SETTINGS_FILE_NAME)),
            (None, None) => Self::at(SETTINGS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load settings, returning validated defaults if absent or unreadable.
    pub fn load(&self) -> Settings {
        let mut settings = match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<Settings>(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "corrupt settings file, using defaults");
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file yet");
                Settings::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read settings, using defaults");
                Settings::default()
            }
        };
        settings.validate();
        settings
    }

    /// Load, writing the defaults out when the file does not exist yet.
    pub fn load_or_create(&self) -> Settings {
        let settings = self.load();
        if !self.exists() {
            match self.save(&settings) {
                Ok(()) => info!(path = %self.path.display(), "created settings file"),
                Err(e) => warn!(error = %e, "could not create settings file"),
            }
        }
        settings
    }

    /// Write settings as pretty JSON via a temporary file and rename.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| SettingsError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Theme;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("nope.json"));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(SettingsStore::at(&path).load(), Settings::default());
    }

    #[test]
    fn save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("a").join("b").join(SETTINGS_FILE_NAME));
        let settings = Settings {
            theme: Theme::Light,
            ..Settings::default()
        };
        store.save(&settings).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().theme, Theme::Light);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn load_clamps_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(
            &path,
            r#"{ "WindowWidth": 5, "WindowHeight": 99999, "FontSize": 500, "Opacity": 3.0 }"#,
        )
        .unwrap();
        let s = SettingsStore::at(&path).load();
        assert_eq!(s.window_width, 100.0);
        assert_eq!(s.window_height, 1000.0);
        assert_eq!(s.font_size, 72);
        assert_eq!(s.opacity, 1.0);
    }

    #[test]
    fn load_or_create_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join(SETTINGS_FILE_NAME));
        assert!(!store.exists());
        store.load_or_create();
        assert!(store.exists());
    }

    #[test]
    fn portable_file_takes_precedence() {
        let exe = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();

        let store = SettingsStore::locate_in(Some(exe.path()), Some(data.path()));
        assert_eq!(store.path(), data.path().join(SETTINGS_FILE_NAME));

        fs::write(exe.path().join(SETTINGS_FILE_NAME), "{}").unwrap();
        let store = SettingsStore::locate_in(Some(exe.path()), Some(data.path()));
        assert_eq!(store.path(), exe.path().join(SETTINGS_FILE_NAME));
    }
}
