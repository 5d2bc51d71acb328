//! PNG snapshots of the chart area.

use std::io::Cursor;

use eframe::egui::{ColorImage, Rect};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::{GrapherError, Result};
use crate::state::palette::Rgb;

/// Crop a captured frame to `crop` (in points) and flatten it onto `background`.
///
/// Frame pixels are premultiplied, so compositing is `src + bg * (1 - alpha)`.
pub fn compose_snapshot(
    frame: &ColorImage,
    crop: Option<Rect>,
    pixels_per_point: f32,
    background: Rgb,
) -> Result<RgbaImage> {
    let [full_w, full_h] = frame.size;
    let (x0, y0, x1, y1) = match crop {
        Some(rect) => (
            ((rect.left() * pixels_per_point).max(0.0) as usize).min(full_w),
            ((rect.top() * pixels_per_point).max(0.0) as usize).min(full_h),
            ((rect.right() * pixels_per_point).ceil().max(0.0) as usize).min(full_w),
            ((rect.bottom() * pixels_per_point).ceil().max(0.0) as usize).min(full_h),
        ),
        None => (0, 0, full_w, full_h),
    };
    let width = x1.saturating_sub(x0);
    let height = y1.saturating_sub(y0);
    if width == 0 || height == 0 {
        return Err(GrapherError::MissingInput("chart area is empty".into()));
    }

    let [br, bg, bb] = background.0;
    let blend = |src: u8, alpha: u8, back: u8| -> u8 {
        let under = (u16::from(back) * (255 - u16::from(alpha)) + 127) / 255;
        (u16::from(src) + under).min(255) as u8
    };

    Ok(RgbaImage::from_fn(width as u32, height as u32, |x, y| {
        let c = frame.pixels[(y0 + y as usize) * full_w + x0 + x as usize];
        let a = c.a();
        Rgba([blend(c.r(), a, br), blend(c.g(), a, bg), blend(c.b(), a, bb), 255])
    }))
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
