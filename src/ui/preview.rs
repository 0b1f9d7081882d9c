use image::{DynamicImage, GenericImageView, RgbaImage};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

/// Largest pixel dimension kept after decode; plenty for cell resolution
const MAX_DIMENSION: f32 = 320.0;

/// Alpha below this renders as the terminal background
const ALPHA_CUTOFF: u8 = 8;

/// A decoded reference image held ready for cell rendering
#[derive(Clone, Debug)]
pub struct ImagePreview {
    image: DynamicImage,
}

impl ImagePreview {
    /// Decode fetched bytes and downscale once so the per-frame fit resize
    /// stays cheap. None when the bytes are not a supported image.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let decoded = image::load_from_memory(bytes).ok()?;
        let (width, height) = decoded.dimensions();
        let largest = width.max(height) as f32;
        let scale = (MAX_DIMENSION / largest).min(1.0);

        let image = if scale < 1.0 {
            decoded.resize(
                (width as f32 * scale) as u32,
                (height as f32 * scale) as u32,
                image::imageops::FilterType::Triangle,
            )
        } else {
            decoded
        };

        Some(Self { image })
    }

    /// Paint into `area` as half blocks, two vertical pixels per cell,
    /// centered. `dimmed` darkens the image for the preparation phase.
    pub fn render(&self, area: Rect, buf: &mut Buffer, dimmed: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // a cell is one pixel wide and two pixels tall
        let fitted = self.image.resize(
            area.width as u32,
            area.height as u32 * 2,
            image::imageops::FilterType::Triangle,
        );
        let rgba = fitted.to_rgba8();

        let cols = rgba.width().min(area.width as u32) as u16;
        let rows = (rgba.height().div_ceil(2)).min(area.height as u32) as u16;
        let x0 = area.x + (area.width - cols) / 2;
        let y0 = area.y + (area.height - rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let top = pixel_color(&rgba, col as u32, row as u32 * 2, dimmed);
                let bottom = pixel_color(&rgba, col as u32, row as u32 * 2 + 1, dimmed);

                if let Some(cell) = buf.cell_mut((x0 + col, y0 + row)) {
                    match (top, bottom) {
                        (Some(top), Some(bottom)) => {
                            cell.set_symbol("▀");
                            cell.set_fg(top);
                            cell.set_bg(bottom);
                        }
                        (Some(top), None) => {
                            cell.set_symbol("▀");
                            cell.set_fg(top);
                        }
                        (None, Some(bottom)) => {
                            cell.set_symbol("▄");
                            cell.set_fg(bottom);
                        }
                        // both halves transparent, keep the terminal background
                        (None, None) => {}
                    }
                }
            }
        }
    }
}

fn pixel_color(rgba: &RgbaImage, x: u32, y: u32, dimmed: bool) -> Option<Color> {
    if x >= rgba.width() || y >= rgba.height() {
        return None;
    }

    let pixel = rgba.get_pixel(x, y).0;
    if pixel[3] < ALPHA_CUTOFF {
        return None;
    }

    let factor = if dimmed { 0.35 } else { 1.0 };
    Some(Color::Rgb(
        (pixel[0] as f32 * factor) as u8,
        (pixel[1] as f32 * factor) as u8,
        (pixel[2] as f32 * factor) as u8,
    ))
}
