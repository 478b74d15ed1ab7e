//! Overlay window, timers and the message loop.
//!
//! The [`App`] lives in a thread-local and is only borrowed for the length of
//! one message. Messages that arrive re-entrantly while it is borrowed (from
//! `SetWindowPos`, `SetCapture`, ...) fall through to `DefWindowProcW`.

use std::cell::RefCell;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
    IsDialogMessageW, KillTimer, LoadCursorW, PostQuitMessage, RegisterClassW, SetTimer,
    ShowWindow, TranslateMessage, CS_HREDRAW, CS_VREDRAW, IDC_ARROW, MSG, SW_SHOWNOACTIVATE,
    WM_CAPTURECHANGED, WM_COMMAND, WM_DESTROY, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE,
    WM_SETCURSOR, WM_TIMER, WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW,
    WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};

use super::input::{cursor_position, modifiers_held, TIMER_DESKTOP, TIMER_INPUT};
use super::pin::VirtualDesktopPin;
use super::registry::{windows_build_number, RegistryThemeProbe, WinRegistry};
use super::startup::RunKeyRegistration;
use super::surface::{apply_cursor, primary_screen_size, Win32Surface};
use super::ui::dialogs::{show_error, show_info};
use super::ui::fonts::system_font_families;
use super::ui::overlay::Renderer;
use super::ui::settings::{open_settings_window, settings_hwnd};
use super::ui::tray::{self, menu_event, tray_action, TrayAction, WM_TRAYICON};
use super::{post_wake, WM_APP_EVENTS};
use crate::compat::check_windows_build;
use crate::desktop::DesktopPoller;
use crate::events::{AppEvent, EventBus, EventPublisher};
use crate::model::constants::*;
use crate::model::{EffectiveTheme, Settings};
use crate::overlay::{DesktopPin, OverlayController, Services, WindowSurface};
use crate::settings::{SettingsStore, StartupRegistration};

/// Work that must run after the app borrow is released (modal UI, window
/// creation or destruction).
enum FollowUp {
    None,
    OpenSettings(Settings, EffectiveTheme, EventPublisher),
    ResetNotice,
    Quit,
}

struct App {
    hwnd: HWND,
    controller: OverlayController<Win32Surface>,
    poller: DesktopPoller<WinRegistry>,
    renderer: Renderer,
    bus: EventBus,
}

impl App {
    fn redraw_if_needed(&mut self) {
        if !self.controller.surface_mut().take_redraw() {
            return;
        }
        let bounds = self.controller.surface().bounds();
        let appearance = self.controller.appearance();
        if let Err(e) = self.renderer.draw(self.hwnd, bounds, &appearance) {
            warn!(error = %e, "overlay redraw failed");
        }
    }

    fn on_input_tick(&mut self, now: Instant) {
        self.controller.on_modifiers(modifiers_held(), now);
        if let Some(cursor) = cursor_position() {
            self.controller.on_pointer(cursor, now);
        }
        self.controller.tick(now);
        self.redraw_if_needed();
    }

    fn on_desktop_tick(&mut self) {
        if let Some(info) = self.poller.poll().cloned() {
            self.controller.set_desktop(info);
        }
        self.redraw_if_needed();
    }

    fn handle(&mut self, event: AppEvent, now: Instant) -> FollowUp {
        debug!(event = event.description(), "handling event");
        let follow_up = match event {
            AppEvent::OpenSettings => {
                let settings = self.controller.settings().clone();
                let theme = settings.effective_theme(self.controller.theme_probe());
                FollowUp::OpenSettings(settings, theme, self.bus.publisher())
            }
            AppEvent::ToggleLock => {
                self.controller.toggle_lock(now);
                FollowUp::None
            }
            AppEvent::Exit => FollowUp::Quit,
            AppEvent::PreviewSettings(settings) => {
                self.controller.preview(settings);
                FollowUp::None
            }
            AppEvent::SaveSettings(settings) => {
                self.controller.commit(settings);
                FollowUp::None
            }
            AppEvent::CancelSettings => {
                self.controller.revert_preview();
                FollowUp::None
            }
            AppEvent::ResetPosition => {
                let (screen_width, screen_height) = primary_screen_size();
                self.controller.reset_position(screen_width, screen_height);
                FollowUp::ResetNotice
            }
            AppEvent::SettingsClosed => FollowUp::None,
        };
        self.redraw_if_needed();
        follow_up
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|a| {
        let mut app = a.try_borrow_mut().ok()?;
        app.as_mut().map(f)
    })
}

/// Publish an event from this window's own handlers.
fn publish(hwnd: HWND, event: AppEvent) {
    with_app(|app| app.bus.publisher().publish(event));
    post_wake(hwnd);
}

fn drain_events(hwnd: HWND) {
    let Some(events) = with_app(|app| app.bus.drain()) else {
        return;
    };
    for event in events {
        let follow_up = with_app(|app| app.handle(event, Instant::now())).unwrap_or(FollowUp::None);
        match follow_up {
            FollowUp::None => {}
            FollowUp::OpenSettings(settings, theme, publisher) => {
                open_settings_window(hwnd, &settings, theme, system_font_families(), publisher);
            }
            FollowUp::ResetNotice => {
                let owner = settings_hwnd().unwrap_or(hwnd);
                show_info(
                    owner,
                    "Position Reset",
                    "Position reset to default (lower-right corner)",
                );
            }
            FollowUp::Quit => {
                info!("exit requested");
                unsafe {
                    let _ = DestroyWindow(hwnd);
                }
                return;
            }
        }
    }
}

/// Create the overlay and run the message loop until Exit.
pub fn run() -> Result<()> {
    unsafe {
        if let Err(e) = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) {
            debug!(error = %e, "DPI awareness not changed");
        }
    }

    if let Err(e) = check_windows_build(windows_build_number()) {
        show_error(APP_DISPLAY_NAME, &e.to_string());
        return Err(e).context("unsupported Windows version");
    }

    unsafe {
        CoInitializeEx(None, COINIT_APARTMENTTHREADED)
            .ok()
            .context("initializing COM")?;
    }
    let result = run_overlay();
    unsafe {
        CoUninitialize();
    }
    result
}

fn run_overlay() -> Result<()> {
    let renderer = Renderer::new().context("creating Direct2D/DirectWrite factories")?;

    let store = SettingsStore::locate();
    info!(path = ?store.path(), "settings file");
    let mut settings = store.load_or_create();

    // The registry is the truth for the autorun entry.
    let startup = RunKeyRegistration::new();
    settings.run_at_startup = startup.is_enabled();

    if settings.needs_default_position() {
        let (screen_width, screen_height) = primary_screen_size();
        let (width, height) = (settings.window_width, settings.window_height);
        settings.set_default_position(screen_width, screen_height, width, height);
    }
    let bounds = settings.bounds();

    let hwnd = unsafe {
        let instance = GetModuleHandleW(None).context("module handle")?;
        let class_name = w!("VirtualDesktopOverlay");

        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wndproc),
            hInstance: instance.into(),
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hIcon: tray::app_icon(),
            lpszClassName: class_name,
            ..Default::default()
        };
        RegisterClassW(&wc);

        // Layered, click-through, topmost, never activated, no taskbar button
        let ex_style =
            WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOPMOST | WS_EX_NOACTIVATE | WS_EX_TOOLWINDOW;

        CreateWindowExW(
            ex_style,
            class_name,
            w!("Virtual Desktop Overlay"),
            WS_POPUP,
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            None,
            None,
            Some(instance.into()),
            None,
        )
        .context("creating the overlay window")?
    };

    if let Err(e) = VirtualDesktopPin::new(hwnd).pin_to_all_desktops() {
        warn!(error = %e, "virtual desktop pinning failed");
    }

    let services = Services {
        store,
        startup: Box::new(startup),
        theme: Box::new(RegistryThemeProbe),
    };
    let app = App {
        hwnd,
        controller: OverlayController::new(Win32Surface::new(hwnd), settings, services),
        poller: DesktopPoller::new(WinRegistry::current_user()),
        renderer,
        bus: EventBus::new(),
    };
    APP.with(|a| *a.borrow_mut() = Some(app));

    with_app(|app| {
        app.controller.start(Instant::now());
        app.on_desktop_tick();
    });

    tray::install_tray_icon(hwnd);

    unsafe {
        SetTimer(
            Some(hwnd),
            TIMER_INPUT,
            INPUT_POLL_INTERVAL.as_millis() as u32,
            None,
        );
        SetTimer(
            Some(hwnd),
            TIMER_DESKTOP,
            DESKTOP_POLL_INTERVAL.as_millis() as u32,
            None,
        );
        let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);
    }
    info!(?bounds, "overlay running");

    // Message loop
    unsafe {
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            if let Some(dialog) = settings_hwnd() {
                if IsDialogMessageW(dialog, &msg).as_bool() {
                    continue;
                }
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    tray::remove_tray_icon();
    APP.with(|a| a.borrow_mut().take());
    info!("overlay stopped");
    Ok(())
}

extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe {
        match msg {
            WM_TIMER => {
                match wparam.0 {
                    TIMER_INPUT => {
                        with_app(|app| app.on_input_tick(Instant::now()));
                    }
                    TIMER_DESKTOP => {
                        with_app(|app| app.on_desktop_tick());
                    }
                    _ => {}
                }
                LRESULT(0)
            }

            msg if msg == WM_APP_EVENTS => {
                drain_events(hwnd);
                LRESULT(0)
            }

            // System tray icon messages
            msg if msg == WM_TRAYICON => {
                match tray_action((lparam.0 & 0xFFFF) as u32) {
                    TrayAction::ShowMenu => {
                        let unlocked = with_app(|app| app.controller.is_unlocked()).unwrap_or(false);
                        tray::show_tray_menu(hwnd, unlocked);
                    }
                    TrayAction::Event(event) => publish(hwnd, event),
                    TrayAction::None => {}
                }
                LRESULT(0)
            }

            // Context menu commands
            WM_COMMAND => {
                if let Some(event) = menu_event((wparam.0 & 0xFFFF) as u32) {
                    publish(hwnd, event);
                }
                LRESULT(0)
            }

            WM_SETCURSOR => {
                let glyph = with_app(|app| cursor_position().map(|p| app.controller.cursor_at(p)));
                match glyph.flatten() {
                    Some(glyph) => {
                        apply_cursor(glyph);
                        LRESULT(1)
                    }
                    None => DefWindowProcW(hwnd, msg, wparam, lparam),
                }
            }

            WM_LBUTTONDOWN => {
                with_app(|app| {
                    if let Some(cursor) = cursor_position() {
                        app.controller.begin_drag(cursor, Instant::now());
                        app.redraw_if_needed();
                    }
                });
                LRESULT(0)
            }

            WM_MOUSEMOVE => {
                with_app(|app| {
                    if let Some(cursor) = cursor_position() {
                        app.controller.drag_to(cursor, Instant::now());
                        app.redraw_if_needed();
                    }
                });
                LRESULT(0)
            }

            WM_LBUTTONUP | WM_CAPTURECHANGED => {
                with_app(|app| {
                    app.controller.end_drag(Instant::now());
                    app.redraw_if_needed();
                });
                LRESULT(0)
            }

            WM_DESTROY => {
                let _ = KillTimer(Some(hwnd), TIMER_INPUT);
                let _ = KillTimer(Some(hwnd), TIMER_DESKTOP);
                PostQuitMessage(0);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}
