//! Installed font families for the settings dialog.

use windows::Win32::Foundation::LPARAM;
use windows::Win32::Graphics::Gdi::{
    EnumFontFamiliesExW, GetDC, ReleaseDC, DEFAULT_CHARSET, LOGFONTW, TEXTMETRICW,
};

use crate::settings::form::normalize_font_list;

unsafe extern "system" fn collect_family(
    logfont: *const LOGFONTW,
    _metrics: *const TEXTMETRICW,
    _font_type: u32,
    lparam: LPARAM,
) -> i32 {
    let names = &mut *(lparam.0 as *mut Vec<String>);
    if let Some(logfont) = logfont.as_ref() {
        let face = &logfont.lfFaceName;
        let len = face.iter().position(|&c| c == 0).unwrap_or(face.len());
        names.push(String::from_utf16_lossy(&face[..len]));
    }
    1
}

/// Sorted, de-duplicated family names without vertical variants.
pub fn system_font_families() -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    unsafe {
        let dc = GetDC(None);
        let logfont = LOGFONTW {
            lfCharSet: DEFAULT_CHARSET,
            ..Default::default()
        };
        EnumFontFamiliesExW(
            dc,
            &logfont,
            Some(collect_family),
            LPARAM(&mut names as *mut Vec<String> as isize),
            0,
        );
        ReleaseDC(None, dc);
    }
    normalize_font_list(names)
}
