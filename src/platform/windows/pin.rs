//! Keep the overlay on every virtual desktop.

use tracing::debug;
use windows::Win32::Foundation::HWND;
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_ALL};
use windows::Win32::UI::Shell::{IVirtualDesktopManager, VirtualDesktopManager};
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowLongPtrW, SetWindowLongPtrW, GWL_EXSTYLE, WS_EX_TOOLWINDOW,
};

use crate::overlay::{DesktopPin, PinError};

/// The public `IVirtualDesktopManager` cannot pin; confirming the window is
/// known to it and marking it a tool window is the documented-API best effort.
pub struct VirtualDesktopPin {
    hwnd: HWND,
}

impl VirtualDesktopPin {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }
}

impl DesktopPin for VirtualDesktopPin {
    fn pin_to_all_desktops(&self) -> Result<(), PinError> {
        unsafe {
            let manager: IVirtualDesktopManager =
                CoCreateInstance(&VirtualDesktopManager, None, CLSCTX_ALL)
                    .map_err(|e| PinError::Unavailable(e.to_string()))?;
            let desktop = manager
                .GetWindowDesktopId(self.hwnd)
                .map_err(|e| PinError::Failed(e.to_string()))?;
            debug!(?desktop, "overlay window desktop");

            let style = GetWindowLongPtrW(self.hwnd, GWL_EXSTYLE);
            SetWindowLongPtrW(self.hwnd, GWL_EXSTYLE, style | WS_EX_TOOLWINDOW.0 as isize);
        }
        Ok(())
    }
}
