//! The overlay window as a [`WindowSurface`].

use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, GetWindowLongPtrW, GetWindowRect, LoadCursorW, SetCursor, SetWindowLongPtrW,
    SetWindowPos, GWL_EXSTYLE, HWND_TOPMOST, IDC_ARROW, IDC_SIZEALL, IDC_SIZENWSE, SM_CXSCREEN,
    SM_CYSCREEN, SWP_NOACTIVATE, WS_EX_TRANSPARENT,
};

use crate::overlay::{Bounds, CursorGlyph, SurfaceError, WindowSurface};

pub struct Win32Surface {
    hwnd: HWND,
    dirty: bool,
}

impl Win32Surface {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd, dirty: true }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Consume a pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn ex_style(&self) -> Result<isize, SurfaceError> {
        if self.hwnd.is_invalid() {
            return Err(SurfaceError::NoWindow);
        }
        Ok(unsafe { GetWindowLongPtrW(self.hwnd, GWL_EXSTYLE) })
    }
}

impl WindowSurface for Win32Surface {
    fn click_through(&self) -> Option<bool> {
        let style = self.ex_style().ok()?;
        Some(style & WS_EX_TRANSPARENT.0 as isize != 0)
    }

    fn set_click_through(&mut self, enabled: bool) -> Result<(), SurfaceError> {
        let style = self.ex_style()?;
        let flag = WS_EX_TRANSPARENT.0 as isize;
        let next = if enabled { style | flag } else { style & !flag };
        if next != style {
            unsafe {
                SetWindowLongPtrW(self.hwnd, GWL_EXSTYLE, next);
            }
        }
        Ok(())
    }

    fn set_cursor(&mut self, glyph: CursorGlyph) {
        apply_cursor(glyph);
    }

    fn capture_mouse(&mut self, capture: bool) {
        unsafe {
            if capture {
                SetCapture(self.hwnd);
            } else {
                let _ = ReleaseCapture();
            }
        }
    }

    fn bounds(&self) -> Bounds {
        let mut rect = RECT::default();
        if unsafe { GetWindowRect(self.hwnd, &mut rect) }.is_err() {
            return Bounds::default();
        }
        Bounds::new(
            rect.left,
            rect.top,
            rect.right - rect.left,
            rect.bottom - rect.top,
        )
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), SurfaceError> {
        if self.hwnd.is_invalid() {
            return Err(SurfaceError::NoWindow);
        }
        unsafe {
            SetWindowPos(
                self.hwnd,
                Some(HWND_TOPMOST),
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                SWP_NOACTIVATE,
            )
        }
        .map_err(|e| SurfaceError::Native {
            call: "SetWindowPos",
            message: e.to_string(),
        })?;
        self.dirty = true;
        Ok(())
    }

    fn request_redraw(&mut self) {
        self.dirty = true;
    }
}

/// Show the system cursor for `glyph`.
pub fn apply_cursor(glyph: CursorGlyph) {
    let id = match glyph {
        CursorGlyph::Arrow => IDC_ARROW,
        CursorGlyph::SizeAll => IDC_SIZEALL,
        CursorGlyph::ResizeDiagonal => IDC_SIZENWSE,
    };
    unsafe {
        if let Ok(cursor) = LoadCursorW(None, id) {
            SetCursor(Some(cursor));
        }
    }
}

/// Size of the primary screen in pixels.
pub fn primary_screen_size() -> (f64, f64) {
    unsafe {
        (
            GetSystemMetrics(SM_CXSCREEN) as f64,
            GetSystemMetrics(SM_CYSCREEN) as f64,
        )
    }
}
