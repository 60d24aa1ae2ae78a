//! Where everything goes on each page.
//!
//! Every coordinate used by the composer lives here, as one [`PageLayout`] per
//! [`PageKind`]. Coordinates are pixels on the 700 dpi templates, measured from the
//! top-left corner; text positions are the top-left of the first line.

use crate::data::TaskColumn;

/// A pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

const fn at(x: i32, y: i32) -> Point {
    Point { x, y }
}

/// Day name, day-of-year and short date header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateBlock {
    pub day_name: Point,
    pub day_name_size: f32,
    pub day_number: Point,
    pub short_date: Point,
    pub detail_size: f32,
}

/// One group of the task board. `None` collects tasks outside the known columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGroup {
    pub column: Option<TaskColumn>,
    pub cap: usize,
}

/// The task list, grouped by column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskBoard {
    pub groups: &'static [BoardGroup],
    pub top: i32,
    pub line_step: i32,
    /// Extra space taken by a separator between two groups.
    pub separator_gap: i32,
    pub swatch_x: i32,
    pub swatch_size: u32,
    pub title_x: i32,
    pub title_size: f32,
    pub time_x: i32,
    pub time_size: f32,
    pub rule_from_x: i32,
    pub rule_to_x: i32,
}

/// The log list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRegion {
    pub origin: Point,
    pub line_step: i32,
    pub size: f32,
}

/// The four stat slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsGrid {
    pub size: f32,
    pub work: Point,
    pub focus: Point,
    pub sleep: Point,
    pub leisure: Point,
}

/// The hourly forecast strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherStrip {
    pub hours: &'static [u32],
    /// Centre of the first temperature column.
    pub text_x: i32,
    pub temperature_y: i32,
    pub feels_like_y: i32,
    pub icon: Point,
    /// Horizontal distance between two slots.
    pub step: i32,
    pub size: f32,
}

/// Square QR code region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrRegion {
    pub origin: Point,
    pub size_cm: f32,
    pub dpi: f32,
}

impl QrRegion {
    /// Side of the QR code in pixels.
    pub fn side_px(&self) -> u32 {
        (self.size_cm * CM_TO_INCHES * self.dpi) as u32
    }
}

const CM_TO_INCHES: f32 = 0.393701;

/// Free text, wrapped and capped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRegion {
    pub origin: Point,
    pub size: f32,
    /// Space between two lines, on top of the font size.
    pub line_spacing: i32,
    pub max_lines: usize,
    pub wrap_width: usize,
}

/// Week header and day labels of the weekly page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekBlock {
    pub header: Point,
    pub header_size: f32,
    pub first_day: Point,
    pub day_step: i32,
    pub day_size: f32,
}

/// Page variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Tasks,
    Logs,
    Stats,
    Journal,
    Recap,
    Thoughts,
    Weekly,
    Empty,
}

/// Template and regions of one page kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Template file name inside the templates folder.
    pub template: &'static str,
    pub date: Option<DateBlock>,
    pub board: Option<TaskBoard>,
    pub logs: Option<LogRegion>,
    pub stats: Option<StatsGrid>,
    pub weather: Option<WeatherStrip>,
    pub qr: Option<QrRegion>,
    pub text: Option<TextRegion>,
    pub week: Option<WeekBlock>,
}

const BLANK: PageLayout = PageLayout {
    template: "",
    date: None,
    board: None,
    logs: None,
    stats: None,
    weather: None,
    qr: None,
    text: None,
    week: None,
};

const DATE_HEADER: DateBlock = DateBlock {
    day_name: at(310, 70),
    day_name_size: 195.0,
    day_number: at(340, 270),
    short_date: at(340, 340),
    detail_size: 68.0,
};

const TASK_GROUPS: &[BoardGroup] = &[
    BoardGroup { column: Some(TaskColumn::WorkAmazing), cap: 3 },
    BoardGroup { column: Some(TaskColumn::WorkGreat), cap: 5 },
    BoardGroup { column: Some(TaskColumn::PersonalAmazing), cap: 3 },
    BoardGroup { column: Some(TaskColumn::PersonalGreat), cap: 5 },
    BoardGroup { column: None, cap: 6 },
];

const TASK_BOARD: TaskBoard = TaskBoard {
    groups: TASK_GROUPS,
    top: 488,
    line_step: 115,
    separator_gap: 40,
    swatch_x: 335,
    swatch_size: 50,
    title_x: 415,
    title_size: 78.0,
    time_x: 3150,
    time_size: 54.0,
    rule_from_x: 335,
    rule_to_x: 3400,
};

const STATS: StatsGrid = StatsGrid {
    size: 59.0,
    work: at(715, 140),
    focus: at(985, 140),
    sleep: at(715, 268),
    leisure: at(985, 268),
};

const FORECAST_HOURS: &[u32] = &[6, 9, 12, 15, 18, 21];

const WEATHER: WeatherStrip = WeatherStrip {
    hours: FORECAST_HOURS,
    text_x: 1959,
    temperature_y: 349,
    feels_like_y: 424,
    icon: at(1912, 199),
    step: 138,
    size: 60.0,
};

const JOURNAL_QR: QrRegion = QrRegion {
    origin: at(1500, 140),
    size_cm: 1.0,
    dpi: crate::constants::PDF_DPI,
};

const DAY_TEXT: TextRegion = TextRegion {
    origin: at(135, 520),
    size: 62.0,
    line_spacing: 13,
    max_lines: 36,
    wrap_width: 62,
};

/// The layout of `kind`.
pub fn layout(kind: PageKind) -> PageLayout {
    match kind {
        PageKind::Tasks => PageLayout {
            template: "bitacora_diaria_base_front_task.png",
            date: Some(DATE_HEADER),
            board: Some(TASK_BOARD),
            weather: Some(WEATHER),
            ..BLANK
        },
        PageKind::Logs => PageLayout {
            template: "bitacora_diaria_base_front_logs.png",
            logs: Some(LogRegion {
                origin: at(350, 1770),
                line_step: 90,
                size: 60.0,
            }),
            stats: Some(STATS),
            qr: Some(JOURNAL_QR),
            ..BLANK
        },
        PageKind::Stats => PageLayout {
            template: "bitacora_diaria_stats.png",
            date: Some(DATE_HEADER),
            stats: Some(STATS),
            ..BLANK
        },
        PageKind::Journal => PageLayout {
            template: "bitacora_diaria_journal.png",
            date: Some(DATE_HEADER),
            text: Some(DAY_TEXT),
            ..BLANK
        },
        PageKind::Recap => PageLayout {
            template: "bitacora_diaria_recap.png",
            date: Some(DATE_HEADER),
            text: Some(DAY_TEXT),
            ..BLANK
        },
        PageKind::Thoughts => PageLayout {
            template: "bitacora_diaria_base_back.png",
            text: Some(TextRegion {
                origin: at(135, 120),
                size: 68.0,
                line_spacing: 13,
                max_lines: 41,
                wrap_width: crate::constants::THOUGHTS_WRAP_WIDTH,
            }),
            ..BLANK
        },
        PageKind::Weekly => PageLayout {
            template: "bitacora_semanal_base.png",
            week: Some(WeekBlock {
                header: at(310, 70),
                header_size: 120.0,
                first_day: at(150, 420),
                day_step: 700,
                day_size: 68.0,
            }),
            ..BLANK
        },
        PageKind::Empty => PageLayout {
            template: "bitacora_diaria_empty.png",
            ..BLANK
        },
    }
}
