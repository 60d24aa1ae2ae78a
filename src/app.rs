//! The run-to-completion pipeline.
//!
//! Resolve the page dates, connect to the services, assemble the requested pages and
//! export them. Everything runs on one thread; the first fatal error stops the run.

use crate::ai::{ChatModel, OpenAIClient};
use crate::cli::{CliArgs, PageSelection};
use crate::config::Config;
use crate::constants::{DAILY_PAGES_PREFIX, PDF_DPI, WEEKLY_PAGES_PREFIX};
use crate::data::DataProcessor;
use crate::dates::{now_in, resolve, PageDates};
use crate::errors::AppResult;
use crate::export::{page_title, save_pages_as_pdf, Opener, SystemOpener};
use crate::pages::PageAssembler;
use crate::services::{NotionClient, TickTickClient, WeatherClient};
use image::RgbaImage;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunOutput {
    pub daily_pdf: Option<PathBuf>,
    /// Pages written to the daily PDF.
    pub daily_pages: usize,
    pub weekly_pdf: Option<PathBuf>,
    /// URL of the stored recap note, with `--save-recap`.
    pub recap_url: Option<String>,
}

/// Whether the run calls the chat model.
pub fn needs_chat_model(args: &CliArgs) -> bool {
    args.wants(PageSelection::Recap) || args.save_recap
}

/// Runs the whole pipeline with the live services.
///
/// # Errors
///
/// Fails on invalid configuration, missing credentials, service errors, unreadable
/// templates or fonts, and export failures. Weather failures and missing
/// carry-forward pages are only logged.
pub fn run(mut args: CliArgs) -> AppResult<RunOutput> {
    // Load and validate configuration
    info!("Loading configuration");
    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    if args.interactive {
        let stdin = io::stdin();
        args.prompt_interactively(&mut stdin.lock(), &mut io::stdout())?;
    }

    // Anchor "now" to the configured zone once for the whole run
    let dates = resolve(now_in(config.timezone), args.offsets());
    info!(
        "Task date {}, log date {}, week of {}",
        dates.task_date, dates.log_date, dates.week_start
    );

    // Connect to the services; missing credentials fail here
    let tasks = TickTickClient::login(&config.ticktick, config.timezone)?;
    let notes = NotionClient::new(&config.notion)?;
    let chat = if needs_chat_model(&args) {
        Some(OpenAIClient::new(&config.openai)?)
    } else {
        None
    };
    let weather = if args.no_weather {
        debug!("Weather disabled");
        None
    } else {
        Some(WeatherClient::new(&config.weather)?)
    };

    let data = DataProcessor::new(
        &tasks,
        &notes,
        chat.as_ref().map(|client| client as &dyn ChatModel),
        config.format.clone(),
    );

    generate(&config, &args, &dates, &data, weather.as_ref(), &SystemOpener)
}

/// Assembles and exports the pages of a run against already connected services.
pub fn generate(
    config: &Config,
    args: &CliArgs,
    dates: &PageDates,
    data: &DataProcessor<'_>,
    weather: Option<&WeatherClient>,
    opener: &dyn Opener,
) -> AppResult<RunOutput> {
    if let Some(text) = &args.highlight {
        info!("Adding highlight log");
        data.add_highlight_log(text)?;
    }

    let assembler = PageAssembler::new(config, data, weather)?;
    let mut output = RunOutput::default();

    // Daily pages, in the requested order
    let mut daily: Vec<RgbaImage> = Vec::new();
    let mut task_page = None;
    let mut thoughts_page = None;
    let mut summary = None;

    for selection in &args.pages {
        match selection {
            PageSelection::Tasks => {
                let page = assembler.tasks_page(dates.task_date)?;
                task_page = Some(page.clone());
                daily.push(page);
            }
            PageSelection::Logs => {
                let page = assembler.logs_page(dates.log_date)?;
                let merged = assembler.merge_old_pages(&page, dates.log_date)?;
                if merged.is_empty() {
                    daily.push(page);
                } else {
                    daily.extend(merged);
                }
            }
            PageSelection::Thoughts => {
                let page = assembler.thoughts_page()?;
                thoughts_page = Some(page.clone());
                daily.push(page);
            }
            PageSelection::Stats => daily.push(assembler.stats_page(dates.log_date)?),
            PageSelection::Journal => daily.push(assembler.journal_page(dates.log_date)?),
            PageSelection::Recap => {
                let recap = assembler.recap_page(dates.log_date)?;
                summary = Some(recap.summary);
                daily.push(recap.page);
            }
            PageSelection::Empty => daily.push(assembler.empty_page()?),
        }
    }

    if args.save_recap {
        let summary = match summary {
            Some(summary) => summary,
            None => data.generate_recap_summary(&data.get_day_recap(dates.log_date)?)?,
        };
        let url = data.save_recap_note(dates.log_date, &summary)?;
        info!("Recap note saved at {}", url);
        output.recap_url = Some(url);
    }

    let title = page_title(DAILY_PAGES_PREFIX, dates.task_date);
    output.daily_pages = daily.len();
    output.daily_pdf = save_pages_as_pdf(&config.output_dir, &title, &daily, PDF_DPI)?;

    if let (Some(task_page), Some(thoughts_page)) = (&task_page, &thoughts_page) {
        assembler.store_carry_forward(task_page, thoughts_page, dates.task_date)?;
    }

    if args.weekly {
        let page = assembler.weekly_page(dates.week_start)?;
        let title = page_title(WEEKLY_PAGES_PREFIX, dates.week_start);
        output.weekly_pdf = save_pages_as_pdf(&config.output_dir, &title, &[page], PDF_DPI)?;
    }

    if args.open {
        for path in output.daily_pdf.iter().chain(output.weekly_pdf.iter()) {
            opener.open(path)?;
        }
    }

    info!("Done");
    Ok(output)
}
