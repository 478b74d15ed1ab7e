//! Message boxes: startup compatibility, validation and notices.

use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    MessageBoxW, MB_ICONERROR, MB_ICONINFORMATION, MB_ICONWARNING, MB_OK, MESSAGEBOX_STYLE,
};

use crate::platform::windows::to_wide;

fn show(owner: Option<HWND>, title: &str, message: &str, style: MESSAGEBOX_STYLE) {
    let title_wide = to_wide(title);
    let message_wide = to_wide(message);

    unsafe {
        MessageBoxW(
            owner,
            PCWSTR(message_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | style,
        );
    }
}

/// Fatal startup problem, shown before any window exists.
pub fn show_error(title: &str, message: &str) {
    show(None, title, message, MB_ICONERROR);
}

/// Form validation failure; the dialog stays open.
pub fn show_validation_error(owner: HWND, message: &str) {
    show(Some(owner), "Validation", message, MB_ICONWARNING);
}

pub fn show_info(owner: HWND, title: &str, message: &str) {
    show(Some(owner), title, message, MB_ICONINFORMATION);
}
