//! Settings window for Windows.
//!
//! A modeless dialog over a [`SettingsForm`]. Every edit publishes a live
//! preview; Save validates and publishes the record to persist; Cancel or
//! closing publishes a revert. The overlay window is woken with
//! `WM_APP_EVENTS` after each publish.

use std::cell::RefCell;

use tracing::{debug, warn};
use windows::core::{w, BOOL, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Dwm::{DwmSetWindowAttribute, DWMWA_USE_IMMERSIVE_DARK_MODE};
use windows::Win32::Graphics::Gdi::{
    CreateSolidBrush, DeleteObject, FillRect, GetStockObject, SetBkColor, SetTextColor,
    DEFAULT_GUI_FONT, HBRUSH, HDC,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetClientRect, GetWindowTextLengthW,
    GetWindowTextW, LoadCursorW, RegisterClassW, SendMessageW, SetForegroundWindow,
    SetWindowTextW, ShowWindow, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, HMENU, IDC_ARROW, SW_SHOW,
    WINDOW_EX_STYLE, WINDOW_STYLE, WM_CLOSE, WM_COMMAND, WM_CTLCOLOREDIT, WM_CTLCOLORSTATIC,
    WM_DESTROY, WM_ERASEBKGND, WM_HSCROLL, WM_SETFONT, WNDCLASSW, WS_BORDER, WS_CAPTION,
    WS_CHILD, WS_OVERLAPPED, WS_SYSMENU, WS_TABSTOP, WS_VISIBLE, WS_VSCROLL,
};

use crate::events::{AppEvent, EventPublisher};
use crate::model::{EffectiveTheme, Settings, Theme};
use crate::platform::windows::ui::dialogs::show_validation_error;
use crate::platform::windows::{post_wake, to_wide};
use crate::settings::{NumericField, SettingsForm};
use crate::settings::form::pick_font_index;

// Control IDs (Save/Cancel reuse IDOK/IDCANCEL so Enter and Esc work)
const ID_SAVE_BUTTON: i32 = 1;
const ID_CANCEL_BUTTON: i32 = 2;
const ID_THEME_COMBO: i32 = 101;
const ID_OPACITY_SLIDER: i32 = 102;
const ID_OPACITY_VALUE: i32 = 103;
const ID_FONT_COMBO: i32 = 104;
const ID_FONT_SIZE_EDIT: i32 = 105;
const ID_FONT_SIZE_DOWN: i32 = 106;
const ID_FONT_SIZE_UP: i32 = 107;
const ID_WIDTH_EDIT: i32 = 108;
const ID_WIDTH_DOWN: i32 = 109;
const ID_WIDTH_UP: i32 = 110;
const ID_HEIGHT_EDIT: i32 = 111;
const ID_HEIGHT_DOWN: i32 = 112;
const ID_HEIGHT_UP: i32 = 113;
const ID_ACRYLIC_CHECK: i32 = 114;
const ID_STARTUP_CHECK: i32 = 115;
const ID_RESET_BUTTON: i32 = 116;

// Trackbar messages (from commctrl.h)
const TBM_SETRANGE: u32 = 0x0406;
const TBM_SETPOS: u32 = 0x0405;
const TBM_GETPOS: u32 = 0x0400;

// ComboBox messages
const CB_ADDSTRING: u32 = 0x0143;
const CB_SETCURSEL: u32 = 0x014E;
const CB_GETCURSEL: u32 = 0x0147;
const CBN_SELCHANGE: u32 = 1;

// Button and edit notifications
const BM_GETCHECK: u32 = 0x00F0;
const BM_SETCHECK: u32 = 0x00F1;
const BST_CHECKED: usize = 1;
const BN_CLICKED: u32 = 0;
const EN_CHANGE: u32 = 0x0300;

// Control styles
const ES_AUTOHSCROLL: u32 = 0x0080;
const ES_NUMBER: u32 = 0x2000;
const BS_AUTOCHECKBOX: u32 = 0x0003;
const CBS_DROPDOWNLIST: u32 = 0x0003;
const SS_CENTER: u32 = 0x0001;

// Window dimensions
const WINDOW_WIDTH: i32 = 420;
const WINDOW_HEIGHT: i32 = 460;

// Layout constants
const MARGIN: i32 = 20;
const ROW_HEIGHT: i32 = 40;
const LABEL_WIDTH: i32 = 120;
const FIELD_WIDTH: i32 = 240;
const VALUE_WIDTH: i32 = 50;
const EDIT_WIDTH: i32 = 80;
const STEP_WIDTH: i32 = 28;

/// Handles of the controls whose values are read back.
struct Controls {
    opacity_value: HWND,
    font_size: HWND,
    width: HWND,
    height: HWND,
}

impl Controls {
    fn edit(&self, field: NumericField) -> HWND {
        match field {
            NumericField::FontSize => self.font_size,
            NumericField::Width => self.width,
            NumericField::Height => self.height,
        }
    }
}

struct DialogState {
    hwnd: HWND,
    owner: HWND,
    form: SettingsForm,
    fonts: Vec<String>,
    controls: Controls,
    publisher: EventPublisher,
    brush: HBRUSH,
    text_color: COLORREF,
    back_color: COLORREF,
    closing: bool,
}

impl DialogState {
    fn publish(&self, event: AppEvent) {
        debug!(event = event.description(), "settings dialog event");
        self.publisher.publish(event);
        post_wake(self.owner);
    }

    fn publish_preview(&self) {
        self.publish(AppEvent::PreviewSettings(self.form.preview()));
    }
}

thread_local! {
    static DIALOG: RefCell<Option<DialogState>> = const { RefCell::new(None) };
}

/// Run `f` on the dialog state unless it is absent or already borrowed
/// (control notifications arrive re-entrantly while we set their text).
fn with_state<R>(f: impl FnOnce(&mut DialogState) -> R) -> Option<R> {
    DIALOG.with(|d| {
        let mut state = d.try_borrow_mut().ok()?;
        state.as_mut().map(f)
    })
}

/// Handle of the open dialog, if any.
pub fn settings_hwnd() -> Option<HWND> {
    DIALOG.with(|d| d.try_borrow().ok().and_then(|s| s.as_ref().map(|s| s.hwnd)))
}

fn colorref(r: u8, g: u8, b: u8) -> COLORREF {
    COLORREF(r as u32 | (g as u32) << 8 | (b as u32) << 16)
}

/// Open the settings window, or bring the open one to the front.
pub fn open_settings_window(
    owner: HWND,
    settings: &Settings,
    theme: EffectiveTheme,
    fonts: Vec<String>,
    publisher: EventPublisher,
) {
    if let Some(hwnd) = settings_hwnd() {
        unsafe {
            let _ = SetForegroundWindow(hwnd);
        }
        return;
    }

    unsafe {
        let class_name = w!("VirtualDesktopOverlaySettings");
        let hinstance = GetModuleHandleW(None).unwrap_or_default();

        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(settings_wnd_proc),
            hInstance: hinstance.into(),
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            lpszClassName: class_name,
            ..Default::default()
        };
        // Fails harmlessly when the class survives from an earlier opening.
        let _ = RegisterClassW(&wc);

        let hwnd = match CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class_name,
            w!("Overlay Settings"),
            WS_OVERLAPPED | WS_CAPTION | WS_SYSMENU,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            Some(owner),
            None,
            Some(hinstance.into()),
            None,
        ) {
            Ok(h) => h,
            Err(e) => {
                warn!(error = %e, "failed to create settings window");
                return;
            }
        };

        let (back_color, text_color) = if theme.is_light() {
            (colorref(243, 243, 243), colorref(0, 0, 0))
        } else {
            (colorref(32, 32, 32), colorref(240, 240, 240))
        };
        apply_title_bar_theme(hwnd, theme);

        let form = SettingsForm::from_settings(settings);
        // Controls are filled before the state exists, so their change
        // notifications do not publish previews.
        let controls = create_controls(hwnd, hinstance.into(), &form, &fonts);

        DIALOG.with(|d| {
            *d.borrow_mut() = Some(DialogState {
                hwnd,
                owner,
                form,
                fonts,
                controls,
                publisher,
                brush: CreateSolidBrush(back_color),
                text_color,
                back_color,
                closing: false,
            })
        });

        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = SetForegroundWindow(hwnd);
    }
}

unsafe fn apply_title_bar_theme(hwnd: HWND, theme: EffectiveTheme) {
    let dark = BOOL::from(!theme.is_light());
    if let Err(e) = DwmSetWindowAttribute(
        hwnd,
        DWMWA_USE_IMMERSIVE_DARK_MODE,
        &dark as *const BOOL as *const _,
        std::mem::size_of::<BOOL>() as u32,
    ) {
        debug!(error = %e, "title bar theme not applied");
    }
}

/// Publish `event` once and destroy the window.
fn close_with(hwnd: HWND, event: AppEvent) {
    let first = with_state(|s| {
        if s.closing {
            return false;
        }
        s.closing = true;
        s.publish(event);
        true
    });
    if first == Some(true) {
        unsafe {
            let _ = DestroyWindow(hwnd);
        }
    }
}

unsafe extern "system" fn settings_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_COMMAND => {
            let control_id = (wparam.0 & 0xFFFF) as i32;
            let notification = ((wparam.0 >> 16) & 0xFFFF) as u32;
            let control = HWND(lparam.0 as *mut _);
            handle_command(hwnd, control_id, notification, control);
            LRESULT(0)
        }

        WM_HSCROLL => {
            let slider = HWND(lparam.0 as *mut _);
            handle_opacity_change(slider);
            LRESULT(0)
        }

        WM_CTLCOLORSTATIC | WM_CTLCOLOREDIT => {
            let hdc = HDC(wparam.0 as *mut _);
            let colors = with_state(|s| (s.text_color, s.back_color, s.brush));
            match colors {
                Some((text, back, brush)) => {
                    SetTextColor(hdc, text);
                    SetBkColor(hdc, back);
                    LRESULT(brush.0 as isize)
                }
                None => DefWindowProcW(hwnd, msg, wparam, lparam),
            }
        }

        WM_ERASEBKGND => {
            let hdc = HDC(wparam.0 as *mut _);
            match with_state(|s| s.brush) {
                Some(brush) => {
                    let mut rect = RECT::default();
                    let _ = GetClientRect(hwnd, &mut rect);
                    FillRect(hdc, &rect, brush);
                    LRESULT(1)
                }
                None => DefWindowProcW(hwnd, msg, wparam, lparam),
            }
        }

        WM_CLOSE => {
            close_with(hwnd, AppEvent::CancelSettings);
            LRESULT(0)
        }

        WM_DESTROY => {
            let state = DIALOG.with(|d| d.try_borrow_mut().ok().and_then(|mut s| s.take()));
            if let Some(state) = state {
                if !state.closing {
                    state.publish(AppEvent::CancelSettings);
                }
                state.publish(AppEvent::SettingsClosed);
                let _ = DeleteObject(state.brush.into());
            }
            LRESULT(0)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

unsafe fn handle_command(hwnd: HWND, control_id: i32, notification: u32, control: HWND) {
    match (control_id, notification) {
        (ID_THEME_COMBO, CBN_SELCHANGE) => {
            let selection = combo_selection(control);
            with_state(|s| {
                s.form.theme = Theme::from_index(selection.unwrap_or(0));
                s.publish_preview();
            });
        }
        (ID_FONT_COMBO, CBN_SELCHANGE) => {
            let selection = combo_selection(control);
            with_state(|s| {
                if let Some(family) = selection.and_then(|i| s.fonts.get(i)) {
                    s.form.font_family = family.clone();
                    s.publish_preview();
                }
            });
        }
        (ID_FONT_SIZE_EDIT, EN_CHANGE) => text_changed(NumericField::FontSize, control),
        (ID_WIDTH_EDIT, EN_CHANGE) => text_changed(NumericField::Width, control),
        (ID_HEIGHT_EDIT, EN_CHANGE) => text_changed(NumericField::Height, control),
        (ID_FONT_SIZE_DOWN, BN_CLICKED) => step(NumericField::FontSize, -1),
        (ID_FONT_SIZE_UP, BN_CLICKED) => step(NumericField::FontSize, 1),
        (ID_WIDTH_DOWN, BN_CLICKED) => step(NumericField::Width, -1),
        (ID_WIDTH_UP, BN_CLICKED) => step(NumericField::Width, 1),
        (ID_HEIGHT_DOWN, BN_CLICKED) => step(NumericField::Height, -1),
        (ID_HEIGHT_UP, BN_CLICKED) => step(NumericField::Height, 1),
        (ID_ACRYLIC_CHECK, BN_CLICKED) => {
            let checked = is_checked(control);
            with_state(|s| {
                s.form.acrylic = checked;
                s.publish_preview();
            });
        }
        (ID_STARTUP_CHECK, BN_CLICKED) => {
            let checked = is_checked(control);
            with_state(|s| {
                s.form.run_at_startup = checked;
                s.publish_preview();
            });
        }
        (ID_RESET_BUTTON, BN_CLICKED) => {
            with_state(|s| s.publish(AppEvent::ResetPosition));
        }
        (ID_SAVE_BUTTON, BN_CLICKED) => save(hwnd),
        (ID_CANCEL_BUTTON, BN_CLICKED) => close_with(hwnd, AppEvent::CancelSettings),
        _ => {}
    }
}

unsafe fn save(hwnd: HWND) {
    let Some(result) = with_state(|s| s.form.commit()) else {
        return;
    };
    match result {
        Ok(settings) => close_with(hwnd, AppEvent::SaveSettings(settings)),
        Err(e) => show_validation_error(hwnd, &e.to_string()),
    }
}

unsafe fn text_changed(field: NumericField, edit: HWND) {
    let text = window_text(edit);
    with_state(|s| {
        if s.form.text(field) != text {
            s.form.set_text(field, text);
            s.publish_preview();
        }
    });
}

unsafe fn step(field: NumericField, delta: i32) {
    let stepped = with_state(|s| {
        let value = s.form.step(field, delta);
        s.publish_preview();
        (s.controls.edit(field), value)
    });
    // The resulting EN_CHANGE sees the same text and is ignored.
    if let Some((edit, value)) = stepped {
        set_text(edit, &value.to_string());
    }
}

unsafe fn handle_opacity_change(slider: HWND) {
    let pos = SendMessageW(slider, TBM_GETPOS, None, None).0.clamp(0, 100) as u32;
    let label = with_state(|s| {
        s.form.opacity_pct = pos;
        s.publish_preview();
        (s.controls.opacity_value, s.form.opacity_label())
    });
    if let Some((value_hwnd, text)) = label {
        set_text(value_hwnd, &text);
    }
}

unsafe fn create_controls(
    hwnd: HWND,
    hinstance: HINSTANCE,
    form: &SettingsForm,
    fonts: &[String],
) -> Controls {
    let field_x = MARGIN + LABEL_WIDTH;
    let mut y = MARGIN;

    // Theme row
    create_label(hwnd, hinstance, MARGIN, y, "Theme");
    let theme_combo = create_combobox(hwnd, hinstance, field_x, y, 140, ID_THEME_COMBO);
    for theme in Theme::ALL {
        add_combo_item(theme_combo, theme.as_str());
    }
    set_combo_selection(theme_combo, form.theme.index());

    y += ROW_HEIGHT;

    // Opacity row
    create_label(hwnd, hinstance, MARGIN, y, "Opacity");
    let slider = create_control(
        hwnd,
        hinstance,
        w!("msctls_trackbar32"),
        "",
        WS_TABSTOP,
        (field_x, y, FIELD_WIDTH - VALUE_WIDTH - 10, 28),
        ID_OPACITY_SLIDER,
    );
    init_slider(slider, 0, 100, form.opacity_pct as i32);
    let opacity_value = create_control(
        hwnd,
        hinstance,
        w!("STATIC"),
        &form.opacity_label(),
        WINDOW_STYLE(SS_CENTER),
        (field_x + FIELD_WIDTH - VALUE_WIDTH, y + 4, VALUE_WIDTH, 20),
        ID_OPACITY_VALUE,
    );

    y += ROW_HEIGHT;

    // Font family row
    create_label(hwnd, hinstance, MARGIN, y, "Font");
    let font_combo = create_combobox(hwnd, hinstance, field_x, y, FIELD_WIDTH, ID_FONT_COMBO);
    for family in fonts {
        add_combo_item(font_combo, family);
    }
    if let Some(index) = pick_font_index(&form.font_family, fonts) {
        set_combo_selection(font_combo, index);
    }

    y += ROW_HEIGHT;

    // Integer rows
    let numeric = |label: &str, field: NumericField, ids: (i32, i32, i32), y: i32| {
        create_label(hwnd, hinstance, MARGIN, y, label);
        let edit = create_control(
            hwnd,
            hinstance,
            w!("EDIT"),
            form.text(field),
            WS_TABSTOP | WS_BORDER | WINDOW_STYLE(ES_NUMBER | ES_AUTOHSCROLL),
            (field_x, y + 2, EDIT_WIDTH, 24),
            ids.0,
        );
        create_button(hwnd, hinstance, field_x + EDIT_WIDTH + 6, y, "-", ids.1, STEP_WIDTH);
        create_button(
            hwnd,
            hinstance,
            field_x + EDIT_WIDTH + 6 + STEP_WIDTH + 4,
            y,
            "+",
            ids.2,
            STEP_WIDTH,
        );
        edit
    };
    let font_size = numeric(
        "Font size",
        NumericField::FontSize,
        (ID_FONT_SIZE_EDIT, ID_FONT_SIZE_DOWN, ID_FONT_SIZE_UP),
        y,
    );
    y += ROW_HEIGHT;
    let width = numeric(
        "Width",
        NumericField::Width,
        (ID_WIDTH_EDIT, ID_WIDTH_DOWN, ID_WIDTH_UP),
        y,
    );
    y += ROW_HEIGHT;
    let height = numeric(
        "Height",
        NumericField::Height,
        (ID_HEIGHT_EDIT, ID_HEIGHT_DOWN, ID_HEIGHT_UP),
        y,
    );
    y += ROW_HEIGHT;

    // Checkboxes
    let acrylic = create_control(
        hwnd,
        hinstance,
        w!("BUTTON"),
        "Acrylic effect",
        WS_TABSTOP | WINDOW_STYLE(BS_AUTOCHECKBOX),
        (MARGIN, y, FIELD_WIDTH, 24),
        ID_ACRYLIC_CHECK,
    );
    set_checked(acrylic, form.acrylic);
    y += ROW_HEIGHT - 8;
    let startup = create_control(
        hwnd,
        hinstance,
        w!("BUTTON"),
        "Run at startup",
        WS_TABSTOP | WINDOW_STYLE(BS_AUTOCHECKBOX),
        (MARGIN, y, FIELD_WIDTH, 24),
        ID_STARTUP_CHECK,
    );
    set_checked(startup, form.run_at_startup);
    y += ROW_HEIGHT + 10;

    // Buttons
    create_button(hwnd, hinstance, MARGIN, y, "Reset position", ID_RESET_BUTTON, 110);
    create_button(
        hwnd,
        hinstance,
        WINDOW_WIDTH - 2 * (80 + 10) - MARGIN,
        y,
        "Save",
        ID_SAVE_BUTTON,
        80,
    );
    create_button(
        hwnd,
        hinstance,
        WINDOW_WIDTH - (80 + 10) - MARGIN,
        y,
        "Cancel",
        ID_CANCEL_BUTTON,
        80,
    );

    Controls {
        opacity_value,
        font_size,
        width,
        height,
    }
}

unsafe fn create_control(
    hwnd: HWND,
    hinstance: HINSTANCE,
    class: PCWSTR,
    text: &str,
    style: WINDOW_STYLE,
    (x, y, width, height): (i32, i32, i32, i32),
    id: i32,
) -> HWND {
    let text_wide = to_wide(text);
    let control = CreateWindowExW(
        WINDOW_EX_STYLE::default(),
        class,
        PCWSTR(text_wide.as_ptr()),
        WS_CHILD | WS_VISIBLE | style,
        x,
        y,
        width,
        height,
        Some(hwnd),
        Some(HMENU(id as *mut _)),
        Some(hinstance),
        None,
    )
    .unwrap_or_default();
    let font = GetStockObject(DEFAULT_GUI_FONT);
    SendMessageW(
        control,
        WM_SETFONT,
        Some(WPARAM(font.0 as usize)),
        Some(LPARAM(1)),
    );
    control
}

unsafe fn create_label(hwnd: HWND, hinstance: HINSTANCE, x: i32, y: i32, text: &str) {
    create_control(
        hwnd,
        hinstance,
        w!("STATIC"),
        text,
        WINDOW_STYLE(0),
        (x, y + 4, LABEL_WIDTH, 20),
        -1,
    );
}

unsafe fn create_button(
    hwnd: HWND,
    hinstance: HINSTANCE,
    x: i32,
    y: i32,
    text: &str,
    id: i32,
    width: i32,
) {
    create_control(
        hwnd,
        hinstance,
        w!("BUTTON"),
        text,
        WS_TABSTOP,
        (x, y, width, 26),
        id,
    );
}

unsafe fn create_combobox(
    hwnd: HWND,
    hinstance: HINSTANCE,
    x: i32,
    y: i32,
    width: i32,
    id: i32,
) -> HWND {
    create_control(
        hwnd,
        hinstance,
        w!("COMBOBOX"),
        "",
        WS_TABSTOP | WS_VSCROLL | WINDOW_STYLE(CBS_DROPDOWNLIST),
        // Height includes dropdown area
        (x, y, width, 300),
        id,
    )
}

unsafe fn add_combo_item(combo: HWND, text: &str) {
    let text_wide = to_wide(text);
    SendMessageW(
        combo,
        CB_ADDSTRING,
        None,
        Some(LPARAM(text_wide.as_ptr() as isize)),
    );
}

unsafe fn set_combo_selection(combo: HWND, index: usize) {
    SendMessageW(combo, CB_SETCURSEL, Some(WPARAM(index)), None);
}

unsafe fn combo_selection(combo: HWND) -> Option<usize> {
    let selection = SendMessageW(combo, CB_GETCURSEL, None, None).0;
    usize::try_from(selection).ok()
}

unsafe fn init_slider(slider: HWND, min: i32, max: i32, pos: i32) {
    let range = ((max as isize) << 16) | (min as isize);
    SendMessageW(slider, TBM_SETRANGE, Some(WPARAM(1)), Some(LPARAM(range)));
    SendMessageW(
        slider,
        TBM_SETPOS,
        Some(WPARAM(1)),
        Some(LPARAM(pos as isize)),
    );
}

unsafe fn set_checked(button: HWND, checked: bool) {
    let state = if checked { BST_CHECKED } else { 0 };
    SendMessageW(button, BM_SETCHECK, Some(WPARAM(state)), None);
}

unsafe fn is_checked(button: HWND) -> bool {
    SendMessageW(button, BM_GETCHECK, None, None).0 as usize == BST_CHECKED
}

unsafe fn set_text(hwnd: HWND, text: &str) {
    let text_wide = to_wide(text);
    let _ = SetWindowTextW(hwnd, PCWSTR(text_wide.as_ptr()));
}

unsafe fn window_text(hwnd: HWND) -> String {
    let len = GetWindowTextLengthW(hwnd).max(0) as usize;
    let mut buf = vec![0u16; len + 1];
    let copied = GetWindowTextW(hwnd, &mut buf).max(0) as usize;
    String::from_utf16_lossy(&buf[..copied.min(len)])
}
