//! Resolve the active virtual desktop from Explorer's registry state.
//!
//! The layout is undocumented and differs between Windows builds:
//!
//! - `VirtualDesktops\VirtualDesktopIDs`: concatenated 16-byte GUIDs
//! - `VirtualDesktops\CurrentVirtualDesktop`: the active GUID (older
//!   Windows 10 builds keep it under `SessionInfo\<n>\VirtualDesktops`)
//! - names under `SessionInfo\<n>\VirtualDesktopInfo\Desktops\<GUID>` or
//!   `VirtualDesktops\Desktops\<GUID>`, value `Name`

use tracing::trace;

use super::registry::RegistryReader;
use crate::model::constants::*;
use crate::model::DesktopInfo;

const GUID_LEN: usize = 16;

/// Format a registry GUID blob as `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}`.
///
/// The first three fields are stored little-endian. Returns `None` unless
/// `bytes` is exactly 16 long.
pub fn format_guid(bytes: &[u8]) -> Option<String> {
    let b: &[u8; GUID_LEN] = bytes.try_into().ok()?;
    let d1 = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
    let d2 = u16::from_le_bytes([b[4], b[5]]);
    let d3 = u16::from_le_bytes([b[6], b[7]]);
    Some(format!(
        "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
        d1, d2, d3, b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
    ))
}

/// 1-based position of `current` within the concatenated `ids`.
pub fn desktop_index(ids: &[u8], current: &[u8]) -> Option<usize> {
    if current.len() != GUID_LEN {
        return None;
    }
    ids.chunks_exact(GUID_LEN)
        .position(|chunk| chunk == current)
        .map(|i| i + 1)
}

/// Active desktop GUID blob, from the global key or any session.
fn current_desktop_id(reader: &dyn RegistryReader) -> Option<Vec<u8>> {
    if let Some(id) = reader.binary(REG_VIRTUAL_DESKTOPS, REG_VALUE_CURRENT_DESKTOP) {
        return Some(id);
    }
    reader
        .subkeys(REG_SESSION_INFO)
        .into_iter()
        .find_map(|session| {
            let path = format!("{}\\{}\\VirtualDesktops", REG_SESSION_INFO, session);
            reader.binary(&path, REG_VALUE_CURRENT_DESKTOP)
        })
}

/// User-assigned name for `guid`, session-scoped stores first.
pub fn desktop_name(reader: &dyn RegistryReader, guid: &str) -> Option<String> {
    let non_empty = |name: Option<String>| name.filter(|n| !n.trim().is_empty());

    let from_session = reader
        .subkeys(REG_SESSION_INFO)
        .into_iter()
        .find_map(|session| {
            let path = format!(
                "{}\\{}\\VirtualDesktopInfo\\Desktops\\{}",
                REG_SESSION_INFO, session, guid
            );
            non_empty(reader.string(&path, REG_VALUE_NAME))
        });
    if from_session.is_some() {
        return from_session;
    }

    let path = format!("{}\\{}", REG_VIRTUAL_DESKTOP_NAMES, guid);
    non_empty(reader.string(&path, REG_VALUE_NAME))
}

/// Resolve name and index of the active desktop.
///
/// Never fails: a missing or empty ID list yields ("Desktop 1", 1), an
/// unnamed desktop yields "Desktop {index}".
pub fn current_desktop(reader: &dyn RegistryReader) -> DesktopInfo {
    let ids = match reader.binary(REG_VIRTUAL_DESKTOPS, REG_VALUE_DESKTOP_IDS) {
        Some(ids) if !ids.is_empty() => ids,
        _ => {
            trace!("no virtual desktop list");
            return DesktopInfo::default();
        }
    };

    let current = current_desktop_id(reader).unwrap_or_default();
    let index = desktop_index(&ids, &current).unwrap_or(1);
    let name = format_guid(&current).and_then(|guid| desktop_name(reader, &guid));

    match name {
        Some(name) => DesktopInfo { name, index },
        None => DesktopInfo::unnamed(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUID_A: [u8; 16] = [
        0x78, 0x56, 0x34, 0x12, 0xBC, 0x9A, 0xF0, 0xDE, 0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD,
        0xEF,
    ];

    #[test]
    fn guid_formatting_is_mixed_endian_uppercase() {
        assert_eq!(
            format_guid(&GUID_A).unwrap(),
            "{12345678-9ABC-DEF0-0123-456789ABCDEF}"
        );
        assert_eq!(format_guid(&GUID_A[..15]), None);
    }

    #[test]
    fn index_is_one_based() {
        let mut ids = vec![0u8; 16];
        ids.extend_from_slice(&GUID_A);
        assert_eq!(desktop_index(&ids, &GUID_A), Some(2));
        assert_eq!(desktop_index(&ids, &[9u8; 16]), None);
        assert_eq!(desktop_index(&ids, &[0u8; 4]), None);
    }

    #[test]
    fn trailing_partial_chunk_is_ignored() {
        let mut ids = GUID_A.to_vec();
        ids.extend_from_slice(&[1, 2, 3]);
        assert_eq!(desktop_index(&ids, &GUID_A), Some(1));
    }
}
