//! Page rasters and the primitives used to draw on them.
//!
//! # Module Structure
//!
//! - `layout`: declarative placement table, one entry per page kind
//! - `composer`: drawing steps (date, task board, logs, stats, weather, QR, text)
//! - `qr`: QR code rasterization

pub mod composer;
pub mod layout;
pub mod qr;

pub use layout::{PageKind, PageLayout};

use crate::errors::{AppResult, RenderError};
use ab_glyph::FontArc;
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ink used for every piece of text.
pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

const REGULAR_FONT_FILE: &str = "RobotoMono-Regular.ttf";
const BOLD_FONT_FILE: &str = "RobotoMono-Bold.ttf";
const WEATHER_ICONS_DIR: &str = "weather_icons";

/// The regular and bold faces used on every page.
#[derive(Debug, Clone)]
pub struct Fonts {
    regular: FontArc,
    bold: FontArc,
}

impl Fonts {
    /// Loads both faces from `dir`.
    pub fn load(dir: &Path) -> AppResult<Self> {
        Ok(Self {
            regular: load_font(&dir.join(REGULAR_FONT_FILE))?,
            bold: load_font(&dir.join(BOLD_FONT_FILE))?,
        })
    }

    pub fn face(&self, bold: bool) -> &FontArc {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

fn load_font(path: &Path) -> AppResult<FontArc> {
    let bytes = fs::read(path).map_err(|e| RenderError::Font {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let font = FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!("Loaded font {}", path.display());
    Ok(font)
}

/// Opens an image file as RGBA.
pub fn load_image(path: &Path) -> AppResult<RgbaImage> {
    let image = image::open(path).map_err(|source| RenderError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// The weather icon files, one PNG per icon name.
#[derive(Debug, Clone)]
pub struct IconSet {
    dir: PathBuf,
}

impl IconSet {
    /// Icons under `<templates_dir>/weather_icons`.
    pub fn in_templates(templates_dir: &Path) -> Self {
        Self {
            dir: templates_dir.join(WEATHER_ICONS_DIR),
        }
    }

    pub fn load(&self, name: &str) -> AppResult<RgbaImage> {
        load_image(&self.dir.join(format!("{}.png", name)))
    }
}

/// Parses `#rrggbb` into an opaque color.
///
/// # Examples
///
/// ```
/// use bitacora::render::parse_hex_color;
/// use image::Rgba;
///
/// assert_eq!(parse_hex_color("#99cdf6"), Some(Rgba([0x99, 0xcd, 0xf6, 255])));
/// assert_eq!(parse_hex_color("blue"), None);
/// ```
pub fn parse_hex_color(hex: &str) -> Option<Rgba<u8>> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}
