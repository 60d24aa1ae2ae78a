//! Drawing steps applied to a page raster.
//!
//! Each step takes the page, the fonts and one region of the layout table and draws
//! its content in place. Placement that is worth testing on its own (the task board
//! and the forecast strip) is computed by pure `plan_*` functions first.

use crate::constants::HIGHLIGHT_GLYPH;
use crate::data::{ActiveTaskModel, PersonalStats};
use crate::errors::AppResult;
use crate::render::layout::{
    DateBlock, LogRegion, Point, QrRegion, StatsGrid, TaskBoard, TextRegion, WeatherStrip,
    WeekBlock,
};
use crate::render::qr::qr_image;
use crate::render::{parse_hex_color, Fonts, IconSet, INK};
use crate::services::{DayForecast, HourlyForecast};
use ab_glyph::{FontArc, PxScale};
use chrono::{Datelike, Duration, NaiveDate};
use image::imageops;
use image::RgbaImage;
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::debug;

const RULE_THICKNESS: u32 = 4;

fn draw_text(page: &mut RgbaImage, font: &FontArc, size: f32, at: Point, text: &str) {
    draw_text_mut(page, INK, at.x, at.y, PxScale::from(size), font, text);
}

/// Draws `text` centred on `center`, horizontally and vertically.
fn draw_centered(page: &mut RgbaImage, font: &FontArc, size: f32, center: Point, text: &str) {
    let scale = PxScale::from(size);
    let (width, height) = text_size(scale, font, text);
    let x = center.x - (width / 2) as i32;
    let y = center.y - (height / 2) as i32;
    draw_text_mut(page, INK, x, y, scale, font, text);
}

/// Horizontal separator between `from_x` and `to_x`.
pub fn draw_rule(page: &mut RgbaImage, from_x: i32, to_x: i32, y: i32) {
    if to_x <= from_x {
        return;
    }
    let rect = Rect::at(from_x, y).of_size((to_x - from_x) as u32, RULE_THICKNESS);
    draw_filled_rect_mut(page, rect, INK);
}

/// Day name, "Day <day of year>" and "15-Apr".
pub fn draw_date(page: &mut RgbaImage, fonts: &Fonts, block: &DateBlock, date: NaiveDate) {
    debug!("Adding date {} to page", date);
    let regular = fonts.face(false);

    let day_name = date.format("%a").to_string();
    let day_number = format!("Day {}", date.ordinal());
    let short_date = date.format("%d-%b").to_string();

    draw_text(page, regular, block.day_name_size, block.day_name, &day_name);
    draw_text(page, regular, block.detail_size, block.day_number, &day_number);
    draw_text(page, regular, block.detail_size, block.short_date, &short_date);
}

/// A task placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedRow {
    /// Index into the task list.
    pub task: usize,
    pub y: i32,
}

/// Rows and separators of a task board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardPlan {
    pub rows: Vec<PlannedRow>,
    /// Vertical position of each separator rule.
    pub separators: Vec<i32>,
}

/// Places tasks on the board: group by group in board order, at most the group's cap
/// per group, on a running vertical offset, with a separator between two non-empty
/// groups. Tasks keep their relative order inside a group.
pub fn plan_task_board(tasks: &[ActiveTaskModel], board: &TaskBoard) -> BoardPlan {
    let mut plan = BoardPlan::default();
    let mut y = board.top;

    for group in board.groups {
        let members: Vec<usize> = tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.column == group.column)
            .map(|(index, _)| index)
            .take(group.cap)
            .collect();
        if members.is_empty() {
            continue;
        }

        if !plan.rows.is_empty() {
            plan.separators.push(y + board.separator_gap / 2);
            y += board.separator_gap;
        }
        for task in members {
            plan.rows.push(PlannedRow { task, y });
            y += board.line_step;
        }
    }

    plan
}

/// Draws the task board: swatch, title (bold when important) and due time per row.
pub fn draw_task_board(page: &mut RgbaImage, fonts: &Fonts, board: &TaskBoard, tasks: &[ActiveTaskModel]) {
    let plan = plan_task_board(tasks, board);
    debug!(
        "Drawing {} of {} tasks with {} separators",
        plan.rows.len(),
        tasks.len(),
        plan.separators.len()
    );

    for row in &plan.rows {
        let task = &tasks[row.task];

        if let Some(color) = parse_hex_color(&task.color) {
            let offset = (board.title_size as i32 - board.swatch_size as i32) / 2;
            let swatch = Rect::at(board.swatch_x, row.y + offset)
                .of_size(board.swatch_size, board.swatch_size);
            draw_filled_rect_mut(page, swatch, color);
        }

        draw_text(
            page,
            fonts.face(task.important),
            board.title_size,
            Point { x: board.title_x, y: row.y },
            &task.title,
        );

        if !task.date.is_empty() {
            let offset = ((board.title_size - board.time_size) / 2.0) as i32;
            draw_text(
                page,
                fonts.face(false),
                board.time_size,
                Point { x: board.time_x, y: row.y + offset },
                &task.date,
            );
        }
    }

    for y in plan.separators {
        draw_rule(page, board.rule_from_x, board.rule_to_x, y);
    }
}

/// One log per line; highlighted logs in bold.
pub fn draw_logs(page: &mut RgbaImage, fonts: &Fonts, region: &LogRegion, logs: &[String]) {
    debug!("Adding {} logs to page", logs.len());
    let mut y = region.origin.y;
    for log in logs {
        let bold = log.starts_with(HIGHLIGHT_GLYPH);
        draw_text(page, fonts.face(bold), region.size, Point { x: region.origin.x, y }, log);
        y += region.line_step;
    }
}

/// Stat value as printed: one decimal, nothing for zero or negative values.
pub fn stat_label(value: f64) -> Option<String> {
    (value > 0.0).then(|| format!("{:.1}", value))
}

pub fn draw_stats(page: &mut RgbaImage, fonts: &Fonts, grid: &StatsGrid, stats: &PersonalStats) {
    let slots = [
        (stats.work_time, grid.work),
        (stats.focus_time, grid.focus),
        (stats.sleep_time, grid.sleep),
        (stats.leisure_time, grid.leisure),
    ];
    for (value, at) in slots {
        if let Some(label) = stat_label(value) {
            draw_text(page, fonts.face(false), grid.size, at, &label);
        }
    }
}

/// Forecast slots shown on the strip with their horizontal offset, in strip order.
/// Hours the forecast lacks are skipped without leaving a gap.
pub fn plan_weather<'f>(strip: &WeatherStrip, forecast: &'f DayForecast) -> Vec<(&'f HourlyForecast, i32)> {
    strip
        .hours
        .iter()
        .filter_map(|&hour| forecast.at_hour(hour))
        .enumerate()
        .map(|(index, slot)| (slot, index as i32 * strip.step))
        .collect()
}

/// Temperature, feels-like temperature and condition icon per slot.
pub fn draw_weather(
    page: &mut RgbaImage,
    fonts: &Fonts,
    strip: &WeatherStrip,
    icons: &IconSet,
    forecast: &DayForecast,
) -> AppResult<()> {
    debug!("Adding forecast for {} to page", forecast.date);
    let regular = fonts.face(false);

    for (slot, offset) in plan_weather(strip, forecast) {
        let x = strip.text_x + offset;
        draw_centered(
            page,
            regular,
            strip.size,
            Point { x, y: strip.temperature_y },
            &format!("{}°", slot.temperature),
        );
        draw_centered(
            page,
            regular,
            strip.size,
            Point { x, y: strip.feels_like_y },
            &format!("{}°", slot.feels_like),
        );

        let icon = icons.load(slot.kind.icon_name(slot.hour))?;
        imageops::overlay(
            page,
            &icon,
            i64::from(strip.icon.x + offset),
            i64::from(strip.icon.y),
        );
    }

    Ok(())
}

/// Pastes a QR code of `url` at the region's origin.
pub fn draw_qr(page: &mut RgbaImage, region: &QrRegion, url: &str) -> AppResult<()> {
    let code = qr_image(url, region.side_px())?;
    imageops::replace(
        page,
        &code,
        i64::from(region.origin.x),
        i64::from(region.origin.y),
    );
    Ok(())
}

/// Wraps each line at `width` columns, keeping blank lines.
///
/// # Examples
///
/// ```
/// use bitacora::render::composer::wrap_lines;
///
/// let lines = vec!["one two three".to_string(), String::new()];
/// assert_eq!(wrap_lines(&lines, 7), vec!["one two", "three", ""]);
/// ```
pub fn wrap_lines(lines: &[String], width: usize) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|part| part.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Draws lines top to bottom, stopping at the region's line cap.
pub fn draw_text_block(page: &mut RgbaImage, fonts: &Fonts, region: &TextRegion, lines: &[String]) {
    let step = region.size as i32 + region.line_spacing;
    let mut y = region.origin.y;
    for line in lines.iter().take(region.max_lines) {
        draw_text(page, fonts.face(false), region.size, Point { x: region.origin.x, y }, line);
        y += step;
    }
}

/// Seven consecutive day labels starting at `week_start`.
pub fn week_labels(week_start: NaiveDate) -> Vec<String> {
    (0..7)
        .map(|day| {
            (week_start + Duration::days(day))
                .format("%a %d-%b")
                .to_string()
        })
        .collect()
}

/// Week header and the seven day labels.
pub fn draw_week(page: &mut RgbaImage, fonts: &Fonts, block: &WeekBlock, week_start: NaiveDate) {
    let header = format!("Week of {}", week_start.format("%d-%b"));
    draw_text(page, fonts.face(true), block.header_size, block.header, &header);

    let mut y = block.first_day.y;
    for label in week_labels(week_start) {
        draw_text(page, fonts.face(false), block.day_size, Point { x: block.first_day.x, y }, &label);
        y += block.day_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TaskColumn;
    use crate::render::layout::{layout, BoardGroup, PageKind};
    use crate::services::WeatherKind;
    use image::Rgba;

    fn model(title: &str, column: Option<TaskColumn>) -> ActiveTaskModel {
        ActiveTaskModel {
            title: title.to_string(),
            date: String::new(),
            color: "#98b0fc".to_string(),
            column,
            important: false,
        }
    }

    const GROUPS: &[BoardGroup] = &[
        BoardGroup { column: Some(TaskColumn::WorkGreat), cap: 2 },
        BoardGroup { column: Some(TaskColumn::WorkAmazing), cap: 2 },
        BoardGroup { column: Some(TaskColumn::PersonalGreat), cap: 2 },
        BoardGroup { column: None, cap: 1 },
    ];

    fn board() -> TaskBoard {
        TaskBoard {
            groups: GROUPS,
            top: 100,
            line_step: 10,
            separator_gap: 4,
            ..layout(PageKind::Tasks).board.unwrap()
        }
    }

    #[test]
    fn test_plan_groups_in_board_order_with_caps() {
        let tasks = vec![
            model("p1", Some(TaskColumn::PersonalGreat)),
            model("w1", Some(TaskColumn::WorkGreat)),
            model("w2", Some(TaskColumn::WorkGreat)),
            model("w3", Some(TaskColumn::WorkGreat)),
            model("x1", None),
            model("x2", None),
        ];
        let plan = plan_task_board(&tasks, &board());

        let order: Vec<&str> = plan.rows.iter().map(|row| tasks[row.task].title.as_str()).collect();
        assert_eq!(order, vec!["w1", "w2", "p1", "x1"]);

        let ys: Vec<i32> = plan.rows.iter().map(|row| row.y).collect();
        assert_eq!(ys, vec![100, 110, 124, 138]);
        assert_eq!(plan.separators, vec![122, 136]);
    }

    #[test]
    fn test_plan_without_tasks_is_empty() {
        assert_eq!(plan_task_board(&[], &board()), BoardPlan::default());
    }

    #[test]
    fn test_single_group_has_no_separator() {
        let tasks = vec![
            model("a", Some(TaskColumn::WorkAmazing)),
            model("b", Some(TaskColumn::WorkAmazing)),
        ];
        let plan = plan_task_board(&tasks, &board());
        assert_eq!(plan.rows.len(), 2);
        assert!(plan.separators.is_empty());
    }

    #[test]
    fn test_stat_label() {
        assert_eq!(stat_label(0.0), None);
        assert_eq!(stat_label(-1.0), None);
        assert_eq!(stat_label(7.0).as_deref(), Some("7.0"));
        assert_eq!(stat_label(6.66).as_deref(), Some("6.7"));
    }

    #[test]
    fn test_plan_weather_keeps_strip_hours() {
        let slot = |hour| HourlyForecast {
            hour,
            temperature: 10,
            feels_like: 8,
            kind: WeatherKind::Sunny,
        };
        let forecast = DayForecast {
            date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            hourly: (0..8).map(|i| slot(i * 3)).collect(),
        };
        let strip = layout(PageKind::Tasks).weather.unwrap();

        let planned: Vec<(u32, i32)> = plan_weather(&strip, &forecast)
            .into_iter()
            .map(|(slot, offset)| (slot.hour, offset))
            .collect();
        assert_eq!(
            planned,
            vec![(6, 0), (9, 138), (12, 276), (15, 414), (18, 552), (21, 690)]
        );
    }

    #[test]
    fn test_plan_weather_skips_missing_hours() {
        let slot = |hour| HourlyForecast {
            hour,
            temperature: 10,
            feels_like: 8,
            kind: WeatherKind::Rain,
        };
        let forecast = DayForecast {
            date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            hourly: vec![slot(21), slot(9), slot(6)],
        };
        let strip = layout(PageKind::Tasks).weather.unwrap();

        let planned: Vec<(u32, i32)> = plan_weather(&strip, &forecast)
            .into_iter()
            .map(|(slot, offset)| (slot.hour, offset))
            .collect();
        assert_eq!(planned, vec![(6, 0), (9, 138), (21, 276)]);
    }

    #[test]
    fn test_draw_rule_paints_ink() {
        let mut page = RgbaImage::from_pixel(50, 20, Rgba([255, 255, 255, 255]));
        draw_rule(&mut page, 5, 45, 10);
        assert_eq!(*page.get_pixel(5, 10), INK);
        assert_eq!(*page.get_pixel(44, 13), INK);
        assert_eq!(*page.get_pixel(4, 10), Rgba([255, 255, 255, 255]));
        assert_eq!(*page.get_pixel(20, 14), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_draw_qr_pastes_code() {
        let mut page = RgbaImage::from_pixel(400, 400, Rgba([200, 10, 10, 255]));
        let region = QrRegion {
            origin: Point { x: 50, y: 60 },
            size_cm: 1.0,
            dpi: 700.0,
        };
        draw_qr(&mut page, &region, "https://notes.example/journal").unwrap();
        assert_eq!(*page.get_pixel(50, 60), INK);
        assert_eq!(*page.get_pixel(49, 60), Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn test_wrap_lines_caps_width() {
        let lines = vec!["word ".repeat(30)];
        let wrapped = wrap_lines(&lines, 58);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|line| line.chars().count() <= 58));
    }

    #[test]
    fn test_week_labels() {
        let labels = week_labels(NaiveDate::from_ymd_opt(2024, 4, 13).unwrap());
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0], "Sat 13-Apr");
        assert_eq!(labels[6], "Fri 19-Apr");
    }
}
