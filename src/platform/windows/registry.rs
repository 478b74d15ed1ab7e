//! Win32 registry access for desktop detection, theme and OS version.

use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::ERROR_SUCCESS;
use windows::Win32::System::Registry::{
    RegCloseKey, RegEnumKeyExW, RegGetValueW, RegOpenKeyExW, HKEY, HKEY_CURRENT_USER,
    HKEY_LOCAL_MACHINE, KEY_READ, REG_ROUTINE_FLAGS, RRF_RT_REG_BINARY, RRF_RT_REG_DWORD,
    RRF_RT_REG_SZ,
};

use super::to_wide;
use crate::compat::parse_build_number;
use crate::desktop::RegistryReader;
use crate::model::constants::*;
use crate::model::ThemeProbe;

/// Longest key name the registry allows, plus the terminator.
const MAX_KEY_NAME: usize = 256;

/// Reads below one predefined root key.
#[derive(Debug, Clone, Copy)]
pub struct WinRegistry {
    root: HKEY,
}

impl WinRegistry {
    pub fn current_user() -> Self {
        Self {
            root: HKEY_CURRENT_USER,
        }
    }

    pub fn local_machine() -> Self {
        Self {
            root: HKEY_LOCAL_MACHINE,
        }
    }

    fn raw(&self, path: &str, value: &str, flags: REG_ROUTINE_FLAGS) -> Option<Vec<u8>> {
        let path_w = to_wide(path);
        let value_w = to_wide(value);
        let mut size: u32 = 0;
        unsafe {
            let status = RegGetValueW(
                self.root,
                PCWSTR(path_w.as_ptr()),
                PCWSTR(value_w.as_ptr()),
                flags,
                None,
                None,
                Some(&mut size),
            );
            if status != ERROR_SUCCESS || size == 0 {
                return None;
            }

            let mut data = vec![0u8; size as usize];
            let status = RegGetValueW(
                self.root,
                PCWSTR(path_w.as_ptr()),
                PCWSTR(value_w.as_ptr()),
                flags,
                None,
                Some(data.as_mut_ptr().cast()),
                Some(&mut size),
            );
            if status != ERROR_SUCCESS {
                return None;
            }
            data.truncate(size as usize);
            Some(data)
        }
    }

    /// A `REG_DWORD` value.
    pub fn dword(&self, path: &str, value: &str) -> Option<u32> {
        let data = self.raw(path, value, RRF_RT_REG_DWORD)?;
        let bytes: [u8; 4] = data.get(..4)?.try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }
}

impl RegistryReader for WinRegistry {
    fn binary(&self, path: &str, value: &str) -> Option<Vec<u8>> {
        self.raw(path, value, RRF_RT_REG_BINARY)
    }

    fn string(&self, path: &str, value: &str) -> Option<String> {
        let data = self.raw(path, value, RRF_RT_REG_SZ)?;
        let units: Vec<u16> = data
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .take_while(|&c| c != 0)
            .collect();
        Some(String::from_utf16_lossy(&units))
    }

    fn subkeys(&self, path: &str) -> Vec<String> {
        let path_w = to_wide(path);
        let mut key = HKEY::default();
        let mut names = Vec::new();
        unsafe {
            let status = RegOpenKeyExW(
                self.root,
                PCWSTR(path_w.as_ptr()),
                Some(0),
                KEY_READ,
                &mut key,
            );
            if status != ERROR_SUCCESS {
                return names;
            }

            let mut index = 0;
            loop {
                let mut buf = [0u16; MAX_KEY_NAME];
                let mut len = buf.len() as u32;
                let status = RegEnumKeyExW(
                    key,
                    index,
                    Some(PWSTR(buf.as_mut_ptr())),
                    &mut len,
                    None,
                    None,
                    None,
                    None,
                );
                if status != ERROR_SUCCESS {
                    break;
                }
                names.push(String::from_utf16_lossy(&buf[..len as usize]));
                index += 1;
            }
            let _ = RegCloseKey(key);
        }
        names
    }
}

/// System light/dark preference, read fresh on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryThemeProbe;

impl ThemeProbe for RegistryThemeProbe {
    fn system_prefers_light(&self) -> Option<bool> {
        WinRegistry::current_user()
            .dword(REG_PERSONALIZE, REG_VALUE_APPS_LIGHT)
            .map(|v| v == 1)
    }
}

/// `CurrentBuildNumber` of the running Windows, if readable.
pub fn windows_build_number() -> Option<u32> {
    WinRegistry::local_machine()
        .string(REG_WINDOWS_NT_VERSION, REG_VALUE_BUILD_NUMBER)
        .as_deref()
        .and_then(parse_build_number)
}
