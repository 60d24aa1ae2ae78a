use bitacora::constants::{DAILY_PAGES_PREFIX, PDF_DPI};
use bitacora::dates::{resolve, DateOffsets};
use bitacora::export::{page_title, save_pages_as_pdf};
use bitacora::pages::CarryForward;
use chrono::{NaiveDate, TimeZone};
use image::{Rgba, RgbaImage};
use std::fs;
use tempfile::tempdir;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const TASK_SWATCH: Rgba<u8> = Rgba([153, 205, 246, 255]);

fn page_with(pixel: (u32, u32), color: Rgba<u8>) -> RgbaImage {
    let mut page = RgbaImage::from_pixel(40, 60, WHITE);
    page.put_pixel(pixel.0, pixel.1, color);
    page
}

#[test]
fn test_yesterdays_sheet_receives_todays_logs() {
    let old_pages = tempdir().unwrap();
    let output = tempdir().unwrap();
    let carry_forward = CarryForward::new(old_pages.path());

    // Yesterday's run printed a task sheet for the 15th
    let tz = chrono_tz::America::Bogota;
    let yesterday = resolve(
        tz.with_ymd_and_hms(2024, 4, 14, 21, 0, 0).unwrap(),
        DateOffsets { task_days: 1, ..DateOffsets::default() },
    );
    let task_date = yesterday.task_date;
    assert_eq!(task_date, NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());

    let task_page = page_with((5, 5), TASK_SWATCH);
    let thoughts_page = page_with((10, 10), INK);
    carry_forward.store(&task_page, &thoughts_page, task_date).unwrap();
    assert!(old_pages.path().join("15-apr-2024-old-task-page.png").exists());
    assert!(old_pages.path().join("15-apr-2024-old-thoughts-page.png").exists());

    // Today's run stamps the logs of the 15th onto it
    let today = resolve(
        tz.with_ymd_and_hms(2024, 4, 15, 22, 0, 0).unwrap(),
        DateOffsets::default(),
    );
    let logs_page = page_with((20, 30), INK);
    let merged = carry_forward.merge_old_pages(&logs_page, today.log_date).unwrap();

    assert_eq!(merged.len(), 2);
    assert_eq!(*merged[0].get_pixel(5, 5), TASK_SWATCH);
    assert_eq!(*merged[0].get_pixel(20, 30), INK);
    assert_eq!(*merged[1].get_pixel(10, 10), INK);

    let title = page_title(DAILY_PAGES_PREFIX, today.task_date);
    let pdf = save_pages_as_pdf(output.path(), &title, &merged, PDF_DPI)
        .unwrap()
        .unwrap();
    assert_eq!(pdf.file_name().unwrap(), "bitacora-diaria-15-apr-2024.pdf");
    assert!(fs::metadata(&pdf).unwrap().len() > 0);
}

#[test]
fn test_missing_prior_pages_yield_nothing() {
    let old_pages = tempdir().unwrap();
    let carry_forward = CarryForward::new(old_pages.path());
    let date = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();

    let merged = carry_forward
        .merge_old_pages(&page_with((1, 1), INK), date)
        .unwrap();
    assert!(merged.is_empty());

    // Only the task page stored: still nothing to merge
    fs::create_dir_all(old_pages.path()).unwrap();
    page_with((1, 1), INK)
        .save(old_pages.path().join("15-apr-2024-old-task-page.png"))
        .unwrap();
    let merged = carry_forward
        .merge_old_pages(&page_with((1, 1), INK), date)
        .unwrap();
    assert!(merged.is_empty());
}
