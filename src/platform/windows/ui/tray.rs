//! System tray (notification area) icon for Windows.
//!
//! The context menu is rebuilt on every right-click so the lock item can
//! show the current state. Menu picks come back as `WM_COMMAND` on the
//! overlay window and are mapped to [`AppEvent`]s.

use std::cell::RefCell;

use tracing::warn;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Shell::{
    Shell_NotifyIconW, NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, LoadIconW, PostMessageW,
    SetForegroundWindow, TrackPopupMenu, HICON, IDI_APPLICATION, MF_SEPARATOR, MF_STRING,
    TPM_BOTTOMALIGN, TPM_LEFTALIGN, TPM_RIGHTBUTTON, WM_LBUTTONDBLCLK, WM_NULL, WM_RBUTTONUP,
    WM_USER,
};

use crate::events::AppEvent;
use crate::model::constants::APP_DISPLAY_NAME;

// Custom message for tray icon events
pub const WM_TRAYICON: u32 = WM_USER + 1;

// Menu item IDs
pub const MENU_SETTINGS: u32 = 1001;
pub const MENU_TOGGLE_LOCK: u32 = 1002;
pub const MENU_EXIT: u32 = 1003;

// Tray icon ID
const TRAY_ICON_ID: u32 = 1;

/// `ICON` resource id in `resources/windows/resources.rc`.
pub const APP_ICON_RESOURCE: u16 = 1;

thread_local! {
    static TRAY_HWND: RefCell<Option<HWND>> = const { RefCell::new(None) };
}

/// What a tray callback message asks for.
pub enum TrayAction {
    ShowMenu,
    Event(AppEvent),
    None,
}

/// Install the system tray icon.
pub fn install_tray_icon(hwnd: HWND) {
    unsafe {
        TRAY_HWND.with(|h| *h.borrow_mut() = Some(hwnd));

        let hicon = app_icon();

        let mut nid = NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: hwnd,
            uID: TRAY_ICON_ID,
            uFlags: NIF_ICON | NIF_MESSAGE | NIF_TIP,
            uCallbackMessage: WM_TRAYICON,
            hIcon: hicon,
            ..Default::default()
        };

        let tip_wide: Vec<u16> = APP_DISPLAY_NAME.encode_utf16().collect();
        for (i, &c) in tip_wide.iter().enumerate().take(127) {
            nid.szTip[i] = c;
        }

        if !Shell_NotifyIconW(NIM_ADD, &nid).as_bool() {
            warn!("adding the tray icon failed");
        }
    }
}

/// The executable's embedded icon, or the stock application icon.
pub fn app_icon() -> HICON {
    unsafe {
        let embedded = GetModuleHandleW(None).and_then(|module| {
            LoadIconW(
                Some(module.into()),
                PCWSTR(APP_ICON_RESOURCE as usize as *const u16),
            )
        });
        match embedded {
            Ok(icon) => icon,
            Err(e) => {
                warn!(error = %e, "embedded icon missing, using the stock icon");
                LoadIconW(None, IDI_APPLICATION).unwrap_or_default()
            }
        }
    }
}

/// Remove the tray icon.
pub fn remove_tray_icon() {
    TRAY_HWND.with(|h| {
        if let Some(hwnd) = h.borrow_mut().take() {
            unsafe {
                let nid = NOTIFYICONDATAW {
                    cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                    hWnd: hwnd,
                    uID: TRAY_ICON_ID,
                    ..Default::default()
                };
                let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
            }
        }
    });
}

/// Interpret the mouse message carried in a `WM_TRAYICON` lparam.
pub fn tray_action(mouse_msg: u32) -> TrayAction {
    match mouse_msg {
        WM_RBUTTONUP => TrayAction::ShowMenu,
        WM_LBUTTONDBLCLK => TrayAction::Event(AppEvent::OpenSettings),
        _ => TrayAction::None,
    }
}

/// Map a menu command id to its event.
pub fn menu_event(command: u32) -> Option<AppEvent> {
    match command {
        MENU_SETTINGS => Some(AppEvent::OpenSettings),
        MENU_TOGGLE_LOCK => Some(AppEvent::ToggleLock),
        MENU_EXIT => Some(AppEvent::Exit),
        _ => None,
    }
}

/// Show the context menu at the cursor position.
pub fn show_tray_menu(hwnd: HWND, unlocked: bool) {
    unsafe {
        let menu = match CreatePopupMenu() {
            Ok(menu) => menu,
            Err(e) => {
                warn!(error = %e, "creating the tray menu failed");
                return;
            }
        };

        let lock_label = if unlocked {
            w!("Lock overlay")
        } else {
            w!("Unlock overlay")
        };
        let _ = AppendMenuW(menu, MF_STRING, MENU_SETTINGS as usize, w!("Settings"));
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
        let _ = AppendMenuW(menu, MF_STRING, MENU_TOGGLE_LOCK as usize, lock_label);
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
        let _ = AppendMenuW(menu, MF_STRING, MENU_EXIT as usize, w!("Exit"));

        let mut pt = POINT::default();
        let _ = GetCursorPos(&mut pt);

        // Required for menu to close when clicking outside
        let _ = SetForegroundWindow(hwnd);

        let _ = TrackPopupMenu(
            menu,
            TPM_BOTTOMALIGN | TPM_LEFTALIGN | TPM_RIGHTBUTTON,
            pt.x,
            pt.y,
            None, // nReserved - must be None/0
            hwnd,
            None,
        );
        let _ = PostMessageW(Some(hwnd), WM_NULL, Default::default(), Default::default());
        let _ = DestroyMenu(menu);
    }
}
