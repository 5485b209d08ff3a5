use image::Rgb;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, GetDIBits,
    ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, SRCCOPY,
};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

use crate::core::frame::{Frame, FrameSource};
use crate::settings::{region_size, ScreenRect};

/// Frame source that grabs the configured desktop region with BitBlt on
/// every poll. GDI is nowhere near the fastest capture path, but a region
/// of a few hundred pixels squared stays comfortably above the note rate.
pub struct ScreenRegionSource {
    region: ScreenRect,
}

impl ScreenRegionSource {
    pub fn new(region: ScreenRect) -> Result<Self, String> {
        let (width, height) = region_size(region);
        if width == 0 || height == 0 {
            return Err(format!(
                "Capture region ({}, {}, {}, {}) is empty",
                region.0, region.1, region.2, region.3
            ));
        }
        let screen_width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
        let screen_height = unsafe { GetSystemMetrics(SM_CYSCREEN) };
        if region.0 < 0 || region.1 < 0 || region.2 > screen_width || region.3 > screen_height {
            return Err(format!(
                "Capture region ({}, {}, {}, {}) is outside the {}x{} screen",
                region.0, region.1, region.2, region.3, screen_width, screen_height
            ));
        }
        Ok(Self { region })
    }
}

impl FrameSource for ScreenRegionSource {
    fn latest_frame(&mut self) -> Option<Frame> {
        // Transient GDI failures just skip this iteration
        grab_region(self.region).ok()
    }

    fn region_bounds(&self) -> (u32, u32) {
        region_size(self.region)
    }
}

/// Capture a desktop region using BitBlt
/// Note: captures what is composited on screen, so the game must be visible
pub fn grab_region(region: ScreenRect) -> Result<Frame, String> {
    let (left, top, _, _) = region;
    let (width, height) = region_size(region);
    if width == 0 || height == 0 {
        return Err("Capture region is empty".to_string());
    }
    let width = width as i32;
    let height = height as i32;

    unsafe {
        // Screen device context
        let hdc = GetDC(HWND(0));
        if hdc.is_invalid() {
            return Err("Failed to get screen device context".to_string());
        }

        let mem_dc = CreateCompatibleDC(hdc);
        if mem_dc.is_invalid() {
            let _ = ReleaseDC(HWND(0), hdc);
            return Err("Failed to create compatible DC".to_string());
        }

        let bitmap = CreateCompatibleBitmap(hdc, width, height);
        if bitmap.is_invalid() {
            let _ = DeleteDC(mem_dc);
            let _ = ReleaseDC(HWND(0), hdc);
            return Err("Failed to create compatible bitmap".to_string());
        }

        let old_bitmap = SelectObject(mem_dc, bitmap);

        let result = BitBlt(mem_dc, 0, 0, width, height, hdc, left, top, SRCCOPY);
        if result.is_err() {
            let _ = SelectObject(mem_dc, old_bitmap);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);
            let _ = ReleaseDC(HWND(0), hdc);
            return Err("BitBlt failed - could not capture screen region".to_string());
        }

        // 32bpp keeps rows dword-aligned for any region width, unlike 24bpp
        let mut bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // Negative for top-down bitmap
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0 as u32,
                biSizeImage: 0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed: 0,
                biClrImportant: 0,
            },
            bmiColors: [Default::default(); 1],
        };

        let buffer_size = (width * height * 4) as usize;
        let mut buffer: Vec<u8> = vec![0; buffer_size];

        let scan_lines = GetDIBits(
            mem_dc,
            bitmap,
            0,
            height as u32,
            Some(buffer.as_mut_ptr() as *mut _),
            &mut bmi,
            DIB_RGB_COLORS,
        );

        let _ = SelectObject(mem_dc, old_bitmap);
        let _ = DeleteObject(bitmap);
        let _ = DeleteDC(mem_dc);
        let _ = ReleaseDC(HWND(0), hdc);

        if scan_lines == 0 {
            return Err("Failed to get bitmap bits".to_string());
        }

        // Windows hands back BGRA rows, the frame wants RGB
        let mut frame = Frame::new(width as u32, height as u32);
        for y in 0..height {
            for x in 0..width {
                let idx = ((y * width + x) * 4) as usize;
                let b = buffer[idx];
                let g = buffer[idx + 1];
                let r = buffer[idx + 2];
                frame.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
            }
        }

        Ok(frame)
    }
}
