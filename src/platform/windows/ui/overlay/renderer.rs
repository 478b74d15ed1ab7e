//! Direct2D overlay rendering.
//!
//! Draws the rounded background and the desktop name into a 32-bit DIB and
//! applies it with UpdateLayeredWindow. Per-pixel alpha carries the themed
//! background opacity; the hover fade goes through the blend function's
//! constant alpha.

use tracing::warn;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HWND, POINT, RECT, SIZE};
use windows::Win32::Graphics::Direct2D::Common::{
    D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_PIXEL_FORMAT, D2D_RECT_F,
};
use windows::Win32::Graphics::Direct2D::{
    D2D1CreateFactory, ID2D1DCRenderTarget, ID2D1Factory, ID2D1RenderTarget,
    D2D1_DRAW_TEXT_OPTIONS_CLIP, D2D1_FACTORY_TYPE_SINGLE_THREADED, D2D1_RENDER_TARGET_PROPERTIES,
    D2D1_RENDER_TARGET_TYPE_DEFAULT, D2D1_RENDER_TARGET_USAGE_NONE, D2D1_ROUNDED_RECT,
    D2D1_TEXT_ANTIALIAS_MODE_GRAYSCALE,
};
use windows::Win32::Graphics::DirectWrite::{
    DWriteCreateFactory, IDWriteFactory, IDWriteTextFormat, DWRITE_FACTORY_TYPE_SHARED,
    DWRITE_FONT_STRETCH_NORMAL, DWRITE_FONT_STYLE_NORMAL, DWRITE_FONT_WEIGHT_SEMI_BOLD,
    DWRITE_MEASURING_MODE_NATURAL, DWRITE_PARAGRAPH_ALIGNMENT_CENTER, DWRITE_TEXT_ALIGNMENT_CENTER,
    DWRITE_WORD_WRAPPING_NO_WRAP,
};
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_B8G8R8A8_UNORM;
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GetDC, ReleaseDC, SelectObject,
    AC_SRC_ALPHA, AC_SRC_OVER, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, BLENDFUNCTION,
    DIB_RGB_COLORS,
};
use windows::Win32::UI::WindowsAndMessaging::{UpdateLayeredWindow, ULW_ALPHA};

use crate::model::Color;
use crate::overlay::{Appearance, Bounds, SurfaceError};
use crate::platform::windows::to_wide;

const CORNER_RADIUS: f32 = 8.0;
const TEXT_PADDING: f32 = 8.0;

fn color_f(color: Color) -> D2D1_COLOR_F {
    let (r, g, b, a) = color.to_f32();
    D2D1_COLOR_F { r, g, b, a }
}

fn native(call: &'static str) -> impl FnOnce(windows::core::Error) -> SurfaceError {
    move |e| SurfaceError::Native {
        call,
        message: e.to_string(),
    }
}

/// Direct2D and DirectWrite factories, created once on the UI thread.
pub struct Renderer {
    d2d: ID2D1Factory,
    dwrite: IDWriteFactory,
}

impl Renderer {
    pub fn new() -> windows::core::Result<Self> {
        unsafe {
            let d2d: ID2D1Factory = D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None)?;
            let dwrite: IDWriteFactory = DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED)?;
            Ok(Self { d2d, dwrite })
        }
    }

    fn text_format(&self, family: &str, size: f32) -> windows::core::Result<IDWriteTextFormat> {
        let family_w = to_wide(family);
        unsafe {
            let format = self.dwrite.CreateTextFormat(
                PCWSTR(family_w.as_ptr()),
                None,
                DWRITE_FONT_WEIGHT_SEMI_BOLD,
                DWRITE_FONT_STYLE_NORMAL,
                DWRITE_FONT_STRETCH_NORMAL,
                size,
                w!("en-us"),
            )?;
            format.SetTextAlignment(DWRITE_TEXT_ALIGNMENT_CENTER)?;
            format.SetParagraphAlignment(DWRITE_PARAGRAPH_ALIGNMENT_CENTER)?;
            format.SetWordWrapping(DWRITE_WORD_WRAPPING_NO_WRAP)?;
            Ok(format)
        }
    }

    /// Paint one frame and push it to the layered window at `bounds`.
    pub fn draw(
        &self,
        hwnd: HWND,
        bounds: Bounds,
        appearance: &Appearance,
    ) -> Result<(), SurfaceError> {
        if bounds.width <= 0 || bounds.height <= 0 {
            return Ok(());
        }

        unsafe {
            // Compatible DC and top-down ARGB bitmap
            let screen_dc = GetDC(None);
            let mem_dc = CreateCompatibleDC(Some(screen_dc));

            let bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: bounds.width,
                    biHeight: -bounds.height,
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };

            let mut bits: *mut std::ffi::c_void = std::ptr::null_mut();
            let bitmap = match CreateDIBSection(Some(mem_dc), &bmi, DIB_RGB_COLORS, &mut bits, None, 0)
            {
                Ok(bitmap) if !bits.is_null() => bitmap,
                Ok(bitmap) => {
                    let _ = DeleteObject(bitmap.into());
                    ReleaseDC(None, screen_dc);
                    let _ = DeleteDC(mem_dc);
                    return Err(SurfaceError::Native {
                        call: "CreateDIBSection",
                        message: "no pixel buffer".into(),
                    });
                }
                Err(e) => {
                    ReleaseDC(None, screen_dc);
                    let _ = DeleteDC(mem_dc);
                    return Err(native("CreateDIBSection")(e));
                }
            };
            let old_bitmap = SelectObject(mem_dc, bitmap.into());

            let painted = self.paint(mem_dc, bounds, appearance);

            let pt_src = POINT { x: 0, y: 0 };
            let size = SIZE {
                cx: bounds.width,
                cy: bounds.height,
            };
            let pt_dst = POINT {
                x: bounds.x,
                y: bounds.y,
            };
            let blend = BLENDFUNCTION {
                BlendOp: AC_SRC_OVER as u8,
                BlendFlags: 0,
                SourceConstantAlpha: (appearance.opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
                AlphaFormat: AC_SRC_ALPHA as u8,
            };

            let applied = UpdateLayeredWindow(
                hwnd,
                Some(screen_dc),
                Some(&pt_dst),
                Some(&size),
                Some(mem_dc),
                Some(&pt_src),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            )
            .map_err(native("UpdateLayeredWindow"));

            SelectObject(mem_dc, old_bitmap);
            let _ = DeleteObject(bitmap.into());
            let _ = DeleteDC(mem_dc);
            ReleaseDC(None, screen_dc);

            painted.and(applied)
        }
    }

    unsafe fn paint(
        &self,
        mem_dc: windows::Win32::Graphics::Gdi::HDC,
        bounds: Bounds,
        appearance: &Appearance,
    ) -> Result<(), SurfaceError> {
        let rt_props = D2D1_RENDER_TARGET_PROPERTIES {
            r#type: D2D1_RENDER_TARGET_TYPE_DEFAULT,
            pixelFormat: D2D1_PIXEL_FORMAT {
                format: DXGI_FORMAT_B8G8R8A8_UNORM,
                alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
            },
            dpiX: 96.0,
            dpiY: 96.0,
            usage: D2D1_RENDER_TARGET_USAGE_NONE,
            minLevel: Default::default(),
        };

        let dc_rt: ID2D1DCRenderTarget = self
            .d2d
            .CreateDCRenderTarget(&rt_props)
            .map_err(native("CreateDCRenderTarget"))?;
        let rect = RECT {
            left: 0,
            top: 0,
            right: bounds.width,
            bottom: bounds.height,
        };
        dc_rt.BindDC(mem_dc, &rect).map_err(native("BindDC"))?;
        let rt: ID2D1RenderTarget = dc_rt.into();

        let width = bounds.width as f32;
        let height = bounds.height as f32;

        rt.BeginDraw();
        rt.Clear(Some(&D2D1_COLOR_F {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 0.0,
        }));
        // ClearType needs an opaque target.
        rt.SetTextAntialiasMode(D2D1_TEXT_ANTIALIAS_MODE_GRAYSCALE);

        if let Ok(brush) = rt.CreateSolidColorBrush(&color_f(appearance.background), None) {
            let background = D2D1_ROUNDED_RECT {
                rect: D2D_RECT_F {
                    left: 0.0,
                    top: 0.0,
                    right: width,
                    bottom: height,
                },
                radiusX: CORNER_RADIUS,
                radiusY: CORNER_RADIUS,
            };
            rt.FillRoundedRectangle(&background, &brush);
        }

        match self.text_format(&appearance.font_family, appearance.font_size) {
            Ok(format) => {
                if let Ok(brush) = rt.CreateSolidColorBrush(&color_f(appearance.foreground), None) {
                    let text: Vec<u16> = appearance.text.encode_utf16().collect();
                    let layout = D2D_RECT_F {
                        left: TEXT_PADDING,
                        top: 0.0,
                        right: (width - TEXT_PADDING).max(TEXT_PADDING),
                        bottom: height,
                    };
                    rt.DrawText(
                        &text,
                        &format,
                        &layout,
                        &brush,
                        D2D1_DRAW_TEXT_OPTIONS_CLIP,
                        DWRITE_MEASURING_MODE_NATURAL,
                    );
                }
            }
            Err(e) => warn!(family = %appearance.font_family, error = %e, "text format unavailable"),
        }

        rt.EndDraw(None, None).map_err(native("EndDraw"))
    }
}
