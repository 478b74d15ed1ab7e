//! Run-at-startup entry under the per-user `Run` key.

use windows::core::PCWSTR;
use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_SUCCESS};
use windows::Win32::System::Registry::{
    RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegSetValueExW, HKEY, HKEY_CURRENT_USER,
    KEY_SET_VALUE, REG_SZ,
};

use super::registry::WinRegistry;
use super::to_wide;
use crate::desktop::RegistryReader;
use crate::model::constants::{APP_NAME, REG_RUN};
use crate::settings::startup::startup_command;
use crate::settings::{StartupError, StartupRegistration};

#[derive(Debug, Clone)]
pub struct RunKeyRegistration {
    value_name: String,
}

impl RunKeyRegistration {
    pub fn new() -> Self {
        Self {
            value_name: APP_NAME.to_string(),
        }
    }
}

impl Default for RunKeyRegistration {
    fn default() -> Self {
        Self::new()
    }
}

impl StartupRegistration for RunKeyRegistration {
    fn is_enabled(&self) -> bool {
        WinRegistry::current_user()
            .string(REG_RUN, &self.value_name)
            .is_some_and(|v| !v.is_empty())
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), StartupError> {
        let command = if enabled {
            let exe = std::env::current_exe().map_err(StartupError::ExePath)?;
            Some(startup_command(&exe))
        } else {
            None
        };

        let path = to_wide(REG_RUN);
        let name = to_wide(&self.value_name);
        let mut key = HKEY::default();
        unsafe {
            let status = RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR(path.as_ptr()),
                Some(0),
                KEY_SET_VALUE,
                &mut key,
            );
            if status != ERROR_SUCCESS {
                return Err(StartupError::Registry(format!(
                    "opening Run key failed with code {}",
                    status.0
                )));
            }

            let status = match command {
                Some(command) => {
                    let data: Vec<u8> = to_wide(&command)
                        .iter()
                        .flat_map(|c| c.to_le_bytes())
                        .collect();
                    RegSetValueExW(key, PCWSTR(name.as_ptr()), Some(0), REG_SZ, Some(&data))
                }
                None => match RegDeleteValueW(key, PCWSTR(name.as_ptr())) {
                    ERROR_FILE_NOT_FOUND => ERROR_SUCCESS,
                    other => other,
                },
            };
            let _ = RegCloseKey(key);

            if status != ERROR_SUCCESS {
                return Err(StartupError::Registry(format!(
                    "writing Run value failed with code {}",
                    status.0
                )));
            }
        }
        Ok(())
    }
}
