//! Writing finished pages to disk and handing them to the OS.
//!
//! Pages become one multi-page PDF per run, sized so that each raster prints at its
//! native resolution. Single pages can also be written as PNG, which is how the
//! carry-forward pages are kept between runs.

use crate::constants::FILENAME_DATE_FORMAT;
use crate::errors::{AppResult, ExportError};
use chrono::NaiveDate;
use image::RgbaImage;
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfLayerReference};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

const MM_PER_INCH: f32 = 25.4;
const LAYER_NAME: &str = "page";

/// Lowercase date stamp used in file names ("15-apr-2024").
///
/// # Examples
///
/// ```
/// use bitacora::export::file_stamp;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
/// assert_eq!(file_stamp(date), "15-apr-2024");
/// ```
pub fn file_stamp(date: NaiveDate) -> String {
    date.format(FILENAME_DATE_FORMAT).to_string().to_lowercase()
}

/// `<prefix>-<stamp>`, e.g. "bitacora-diaria-15-apr-2024".
pub fn page_title(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}", prefix, file_stamp(date))
}

/// Physical size in millimetres of a raster printed at `dpi`.
pub fn page_size_mm(page: &RgbaImage, dpi: f32) -> (Mm, Mm) {
    let to_mm = |px: u32| Mm(px as f32 * MM_PER_INCH / dpi);
    (to_mm(page.width()), to_mm(page.height()))
}

fn pdf_error(path: &Path, message: impl Into<String>) -> ExportError {
    ExportError::Pdf {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// PDF images carry no alpha, so pages are flattened to RGB first.
fn to_pdf_image(page: &RgbaImage, path: &Path) -> AppResult<Image> {
    let rgb: Vec<u8> = page
        .pixels()
        .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
        .collect();
    let buffer = RgbImage::from_raw(page.width(), page.height(), rgb)
        .ok_or_else(|| pdf_error(path, "page buffer does not match its dimensions"))?;
    Ok(Image::from_dynamic_image(&DynamicImage::ImageRgb8(buffer)))
}

fn place(page: &RgbaImage, layer: PdfLayerReference, dpi: f32, path: &Path) -> AppResult<()> {
    let image = to_pdf_image(page, path)?;
    image.add_to_layer(
        layer,
        ImageTransform {
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    Ok(())
}

/// Writes `pages` to `<dir>/<title>.pdf`, one PDF page per raster.
///
/// Returns the written path, or `None` when there is nothing to write.
///
/// # Errors
///
/// Returns `ExportError::Pdf` when the document cannot be written and
/// `AppError::Io` when the output folder cannot be created.
pub fn save_pages_as_pdf(
    dir: &Path,
    title: &str,
    pages: &[RgbaImage],
    dpi: f32,
) -> AppResult<Option<PathBuf>> {
    let Some((first, rest)) = pages.split_first() else {
        debug!("No pages to save for {}", title);
        return Ok(None);
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.pdf", title));
    info!("Saving {} ({} pages)", path.display(), pages.len());

    let (width, height) = page_size_mm(first, dpi);
    let (document, page_index, layer_index) = PdfDocument::new(title, width, height, LAYER_NAME);
    place(
        first,
        document.get_page(page_index).get_layer(layer_index),
        dpi,
        &path,
    )?;

    for page in rest {
        let (width, height) = page_size_mm(page, dpi);
        let (page_index, layer_index) = document.add_page(width, height, LAYER_NAME);
        place(
            page,
            document.get_page(page_index).get_layer(layer_index),
            dpi,
            &path,
        )?;
    }

    let file = File::create(&path).map_err(|e| pdf_error(&path, e.to_string()))?;
    document
        .save(&mut BufWriter::new(file))
        .map_err(|e| pdf_error(&path, e.to_string()))?;

    Ok(Some(path))
}

/// Writes `page` to `<dir>/<title>.png`.
pub fn save_page_as_png(dir: &Path, title: &str, page: &RgbaImage) -> AppResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.png", title));
    info!("Saving {}", path.display());

    page.save(&path).map_err(|source| ExportError::Png {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Opens exported files with some external program.
///
/// # Examples
///
/// ```
/// use bitacora::export::Opener;
/// use bitacora::errors::AppResult;
/// use std::path::Path;
///
/// struct Silent;
///
/// impl Opener for Silent {
///     fn open(&self, path: &Path) -> AppResult<()> {
///         println!("Would open {}", path.display());
///         Ok(())
///     }
/// }
///
/// Silent.open(Path::new("bitacora-diaria-15-apr-2024.pdf")).unwrap();
/// ```
pub trait Opener {
    fn open(&self, path: &Path) -> AppResult<()>;
}

/// Opens files with the platform's default handler.
pub struct SystemOpener;

impl SystemOpener {
    /// The launcher command and its leading arguments.
    fn launcher() -> (&'static str, &'static [&'static str]) {
        const WINDOWS_ARGS: &[&str] = &["/C", "start", ""];
        const NO_ARGS: &[&str] = &[];

        if cfg!(target_os = "windows") {
            ("cmd", WINDOWS_ARGS)
        } else if cfg!(target_os = "macos") {
            ("open", NO_ARGS)
        } else {
            ("xdg-open", NO_ARGS)
        }
    }
}

impl Opener for SystemOpener {
    /// Launches the default handler without waiting for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Open` if the launcher cannot be spawned.
    fn open(&self, path: &Path) -> AppResult<()> {
        let (command, args) = Self::launcher();
        debug!("Opening {} with {}", path.display(), command);

        Command::new(command)
            .args(args)
            .arg(path)
            .spawn()
            .map_err(|source| ExportError::Open {
                command: command.to_string(),
                path: path.to_path_buf(),
                source,
            })?;
        Ok(())
    }
}
