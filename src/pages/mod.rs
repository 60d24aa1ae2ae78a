//! Page assembly: one operation per page kind, plus the carry-forward merge.
//!
//! Every page starts from its template image, then the composer steps named by the
//! page's layout run in a fixed order. The carry-forward pages (yesterday's task sheet
//! and thoughts page) are kept as PNG files so a later run can stamp the day's logs on
//! top of them.

use crate::config::Config;
use crate::constants::{OLD_TASK_PAGE_SUFFIX, OLD_THOUGHTS_PAGE_SUFFIX};
use crate::data::DataProcessor;
use crate::errors::AppResult;
use crate::export::{file_stamp, save_page_as_png};
use crate::render::composer::{
    draw_date, draw_logs, draw_qr, draw_stats, draw_task_board, draw_text_block, draw_weather,
    draw_week, wrap_lines,
};
use crate::render::layout::{layout, PageKind, PageLayout};
use crate::render::{load_image, Fonts, IconSet};
use crate::services::WeatherClient;
use chrono::NaiveDate;
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A recap page together with the summary printed on it.
#[derive(Debug, Clone)]
pub struct RecapPage {
    pub page: RgbaImage,
    pub summary: String,
}

/// Builds page rasters from templates and day data.
pub struct PageAssembler<'a> {
    templates_dir: PathBuf,
    thoughts_file: PathBuf,
    fonts: Fonts,
    icons: IconSet,
    data: &'a DataProcessor<'a>,
    /// `None` leaves the forecast strip empty.
    weather: Option<&'a WeatherClient>,
    carry_forward: CarryForward,
}

impl<'a> PageAssembler<'a> {
    /// Loads the fonts and binds the assembler to its data sources.
    pub fn new(
        config: &Config,
        data: &'a DataProcessor<'a>,
        weather: Option<&'a WeatherClient>,
    ) -> AppResult<Self> {
        Ok(Self {
            templates_dir: config.templates_dir.clone(),
            thoughts_file: config.thoughts_file.clone(),
            fonts: Fonts::load(&config.fonts_dir)?,
            icons: IconSet::in_templates(&config.templates_dir),
            data,
            weather,
            carry_forward: CarryForward::new(&config.old_pages_dir),
        })
    }

    fn open(&self, kind: PageKind) -> AppResult<(RgbaImage, PageLayout)> {
        let page_layout = layout(kind);
        let page = load_image(&self.templates_dir.join(page_layout.template))?;
        Ok((page, page_layout))
    }

    /// Date header, hourly forecast and the day's task board.
    pub fn tasks_page(&self, date: NaiveDate) -> AppResult<RgbaImage> {
        info!("Generating tasks page for {}", date);
        let (mut page, page_layout) = self.open(PageKind::Tasks)?;

        if let Some(block) = &page_layout.date {
            draw_date(&mut page, &self.fonts, block, date);
        }
        if let (Some(strip), Some(client)) = (&page_layout.weather, self.weather) {
            if let Some(forecast) = client.forecast(date) {
                draw_weather(&mut page, &self.fonts, strip, &self.icons, &forecast)?;
            }
        }
        if let Some(board) = &page_layout.board {
            let tasks = self.data.get_day_active_tasks(date)?;
            draw_task_board(&mut page, &self.fonts, board, &tasks);
        }

        Ok(page)
    }

    /// The day's logs, its stats and a QR code linking to its journal page.
    pub fn logs_page(&self, date: NaiveDate) -> AppResult<RgbaImage> {
        info!("Generating logs page for {}", date);
        let (mut page, page_layout) = self.open(PageKind::Logs)?;

        if let Some(region) = &page_layout.logs {
            let logs = self.data.get_day_logs(date)?;
            draw_logs(&mut page, &self.fonts, region, &logs);
        }
        if let Some(grid) = &page_layout.stats {
            let stats = self.data.get_day_stats(date)?;
            draw_stats(&mut page, &self.fonts, grid, &stats);
        }
        if let Some(region) = &page_layout.qr {
            let url = self.data.get_day_journal_url(date)?;
            draw_qr(&mut page, region, &url)?;
        }

        Ok(page)
    }

    pub fn stats_page(&self, date: NaiveDate) -> AppResult<RgbaImage> {
        info!("Generating stats page for {}", date);
        let (mut page, page_layout) = self.open(PageKind::Stats)?;

        if let Some(block) = &page_layout.date {
            draw_date(&mut page, &self.fonts, block, date);
        }
        if let Some(grid) = &page_layout.stats {
            let stats = self.data.get_day_stats(date)?;
            draw_stats(&mut page, &self.fonts, grid, &stats);
        }

        Ok(page)
    }

    /// The night reflection of `date`.
    pub fn journal_page(&self, date: NaiveDate) -> AppResult<RgbaImage> {
        info!("Generating journal page for {}", date);
        let lines = self.data.get_day_journal(date)?;
        self.text_page(PageKind::Journal, date, &lines)
    }

    /// A language-model recap of the day logs of `date`.
    pub fn recap_page(&self, date: NaiveDate) -> AppResult<RecapPage> {
        info!("Generating recap page for {}", date);
        let logs = self.data.get_day_recap(date)?;
        let summary = self.data.generate_recap_summary(&logs)?;

        let lines: Vec<String> = summary.lines().map(str::to_string).collect();
        let page = self.text_page(PageKind::Recap, date, &lines)?;
        Ok(RecapPage { page, summary })
    }

    fn text_page(&self, kind: PageKind, date: NaiveDate, lines: &[String]) -> AppResult<RgbaImage> {
        let (mut page, page_layout) = self.open(kind)?;

        if let Some(block) = &page_layout.date {
            draw_date(&mut page, &self.fonts, block, date);
        }
        if let Some(region) = &page_layout.text {
            draw_text_block(
                &mut page,
                &self.fonts,
                region,
                &wrap_lines(lines, region.wrap_width),
            );
        }

        Ok(page)
    }

    /// The thoughts file on the back page.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` when the thoughts file cannot be read.
    pub fn thoughts_page(&self) -> AppResult<RgbaImage> {
        info!("Generating thoughts page from {}", self.thoughts_file.display());
        let (mut page, page_layout) = self.open(PageKind::Thoughts)?;

        if let Some(region) = &page_layout.text {
            let lines = thoughts_lines(&self.thoughts_file, region.wrap_width, region.max_lines)?;
            draw_text_block(&mut page, &self.fonts, region, &lines);
        }

        Ok(page)
    }

    pub fn weekly_page(&self, week_start: NaiveDate) -> AppResult<RgbaImage> {
        info!("Generating weekly page for the week of {}", week_start);
        let (mut page, page_layout) = self.open(PageKind::Weekly)?;

        if let Some(block) = &page_layout.week {
            draw_week(&mut page, &self.fonts, block, week_start);
        }

        Ok(page)
    }

    pub fn empty_page(&self) -> AppResult<RgbaImage> {
        Ok(self.open(PageKind::Empty)?.0)
    }

    /// See [`CarryForward::merge_old_pages`].
    pub fn merge_old_pages(&self, new_page: &RgbaImage, date: NaiveDate) -> AppResult<Vec<RgbaImage>> {
        self.carry_forward.merge_old_pages(new_page, date)
    }

    /// See [`CarryForward::store`].
    pub fn store_carry_forward(
        &self,
        task_page: &RgbaImage,
        thoughts_page: &RgbaImage,
        date: NaiveDate,
    ) -> AppResult<()> {
        self.carry_forward.store(task_page, thoughts_page, date)
    }
}

/// Reads the thoughts file, wrapping each line at `width` and keeping at most `max_lines`.
pub fn thoughts_lines(path: &Path, width: usize, max_lines: usize) -> AppResult<Vec<String>> {
    let raw = fs::read_to_string(path)?;
    let lines: Vec<String> = raw.split('\n').map(|line| line.trim_end_matches('\r').to_string()).collect();
    let mut wrapped = wrap_lines(&lines, width);
    wrapped.truncate(max_lines);
    Ok(wrapped)
}

/// The folder of pages carried from one day's run to the next.
#[derive(Debug, Clone)]
pub struct CarryForward {
    dir: PathBuf,
}

impl CarryForward {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn title(date: NaiveDate, suffix: &str) -> String {
        format!("{}-{}", file_stamp(date), suffix)
    }

    fn path(&self, date: NaiveDate, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}.png", Self::title(date, suffix)))
    }

    /// Stamps `new_page` onto the stored task page of `date`.
    ///
    /// Only the non-white content of `new_page` is transferred. Returns the merged task
    /// page followed by the stored thoughts page, or an empty list (with a warning)
    /// when either stored page is missing.
    pub fn merge_old_pages(&self, new_page: &RgbaImage, date: NaiveDate) -> AppResult<Vec<RgbaImage>> {
        info!("Merging logs page onto the pages stored for {}", date);
        let task_path = self.path(date, OLD_TASK_PAGE_SUFFIX);
        let thoughts_path = self.path(date, OLD_THOUGHTS_PAGE_SUFFIX);

        for path in [&task_path, &thoughts_path] {
            if !path.exists() {
                warn!("Prior page {} not found; skipping the merge", path.display());
                return Ok(Vec::new());
            }
        }

        let mut old_task_page = load_image(&task_path)?;
        let old_thoughts_page = load_image(&thoughts_path)?;
        paste_with_inverted_luma(&mut old_task_page, new_page);

        Ok(vec![old_task_page, old_thoughts_page])
    }

    /// Saves today's task and thoughts pages as the stored pages of `date`.
    pub fn store(&self, task_page: &RgbaImage, thoughts_page: &RgbaImage, date: NaiveDate) -> AppResult<()> {
        save_page_as_png(&self.dir, &Self::title(date, OLD_TASK_PAGE_SUFFIX), task_page)?;
        save_page_as_png(&self.dir, &Self::title(date, OLD_THOUGHTS_PAGE_SUFFIX), thoughts_page)?;
        Ok(())
    }
}

/// ITU-R 601-2 luma, as used for 8-bit grayscale conversion.
fn luma(pixel: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

/// Pastes `top` onto `base` using `255 - luma(top)` as the per-pixel mask: white
/// leaves `base` untouched, black replaces it, greys blend.
pub fn paste_with_inverted_luma(base: &mut RgbaImage, top: &RgbaImage) {
    let width = base.width().min(top.width());
    let height = base.height().min(top.height());

    for y in 0..height {
        for x in 0..width {
            let source = top.get_pixel(x, y);
            let mask = 255 - u32::from(luma(source));
            if mask == 0 {
                continue;
            }
            let target = base.get_pixel_mut(x, y);
            for channel in 0..4 {
                let blended = u32::from(target[channel]) * (255 - mask)
                    + u32::from(source[channel]) * mask;
                target[channel] = ((blended + 127) / 255) as u8;
            }
        }
    }
}
