//! Polled keyboard and cursor state.

use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VIRTUAL_KEY, VK_CONTROL, VK_SHIFT};
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

use crate::overlay::Point;

/// Input timer id on the overlay window.
pub const TIMER_INPUT: usize = 1;

/// Desktop poll timer id on the overlay window.
pub const TIMER_DESKTOP: usize = 2;

fn key_down(key: VIRTUAL_KEY) -> bool {
    let state = unsafe { GetAsyncKeyState(key.0 as i32) };
    (state as u16 & 0x8000) != 0
}

/// Control and Shift both held, regardless of focus.
pub fn modifiers_held() -> bool {
    key_down(VK_CONTROL) && key_down(VK_SHIFT)
}

/// Cursor position in screen pixels.
pub fn cursor_position() -> Option<Point> {
    let mut pt = POINT::default();
    unsafe { GetCursorPos(&mut pt) }.ok()?;
    Some(Point::new(pt.x, pt.y))
}
