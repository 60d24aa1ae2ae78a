//! QR code rasterization.

use crate::errors::{AppResult, RenderError};
use crate::render::{INK, PAPER};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use qrcode::types::Color;
use qrcode::{EcLevel, QrCode};

/// Encodes `data` with low error correction and no quiet zone, scaled to `side` pixels.
pub fn qr_image(data: &str, side: u32) -> AppResult<RgbaImage> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)
        .map_err(RenderError::from)?;
    let modules = code.width();
    let colors = code.to_colors();

    let raw = RgbaImage::from_fn(modules as u32, modules as u32, |x, y| {
        match colors[y as usize * modules + x as usize] {
            Color::Dark => INK,
            Color::Light => PAPER,
        }
    });

    Ok(imageops::resize(&raw, side, side, FilterType::Nearest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_image_size() {
        let image = qr_image("https://notes.example/journal/2024-04-15", 275).unwrap();
        assert_eq!(image.dimensions(), (275, 275));
    }

    #[test]
    fn test_qr_has_no_quiet_zone() {
        // Finder patterns start in the corner module, so the corner pixel is dark.
        let image = qr_image("hello", 100).unwrap();
        assert_eq!(*image.get_pixel(0, 0), INK);
    }

    #[test]
    fn test_empty_payload_still_encodes() {
        assert!(qr_image("", 50).is_ok());
    }
}
