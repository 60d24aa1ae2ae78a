//! Command-line arguments and the interactive prompts.

use crate::constants::{APP_DESCRIPTION, APP_NAME, DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::dates::DateOffsets;
use crate::errors::{AppError, AppResult};
use clap::{Parser, ValueEnum};
use std::io::{BufRead, Write};

/// Daily pages that can be requested with `--pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageSelection {
    /// Task sheet for the task date
    Tasks,
    /// Log sheet for the log date, merged onto the stored task sheet
    Logs,
    /// Thoughts back page
    Thoughts,
    /// Stats page for the log date
    Stats,
    /// Night reflection page for the log date
    Journal,
    /// Language-model recap page for the log date
    Recap,
    /// Blank page
    Empty,
}

/// Printable planner pages stamped with your tasks, logs and journal
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Days from today for the task sheet. Its carry-forward copy is stored under this
    /// date, so `-t 1` lets the next day's log sheet be merged onto it
    #[arg(short = 't', long, default_value_t = 0, allow_hyphen_values = true)]
    pub task_offset: i64,

    /// Days from today for the log sheet. Merged onto the task sheet stored for its date
    #[arg(short = 'l', long, default_value_t = 0, allow_hyphen_values = true)]
    pub log_offset: i64,

    /// Weeks from the current week for the weekly page
    #[arg(short = 'w', long, default_value_t = 0, allow_hyphen_values = true)]
    pub week_offset: i64,

    /// Also generate the weekly page
    #[arg(long)]
    pub weekly: bool,

    /// Ask for the offsets and the weekly page on the terminal
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Daily pages to generate, in order
    #[arg(long, value_enum, value_delimiter = ',', default_values = ["tasks", "logs", "thoughts"])]
    pub pages: Vec<PageSelection>,

    /// Leave the forecast strip empty instead of calling the weather service
    #[arg(long)]
    pub no_weather: bool,

    /// Open the generated PDF files
    #[arg(long)]
    pub open: bool,

    /// Store the recap summary as a note page
    #[arg(long)]
    pub save_recap: bool,

    /// Record a highlighted log entry before generating pages
    #[arg(long, value_name = "TEXT")]
    pub highlight: Option<String>,

    /// Log output format
    #[arg(long, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Print verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn offsets(&self) -> DateOffsets {
        DateOffsets {
            task_days: self.task_offset,
            log_days: self.log_offset,
            weeks: self.week_offset,
        }
    }

    /// Level to log at, raised to `debug` by `--verbose`.
    pub fn effective_log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }

    pub fn wants(&self, page: PageSelection) -> bool {
        self.pages.contains(&page)
    }

    /// Asks for the offsets and the weekly page, replacing the parsed values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Input` for a non-numeric offset and `AppError::Io` when the
    /// terminal cannot be read or written.
    pub fn prompt_interactively<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> AppResult<()> {
        self.task_offset = prompt_offset(input, output, "Task sheet: days from today", self.task_offset)?;
        self.log_offset = prompt_offset(input, output, "Log sheet: days from today", self.log_offset)?;
        self.weekly = prompt_yes_no(input, output, "Generate the weekly page?", self.weekly)?;
        if self.weekly {
            self.week_offset = prompt_offset(input, output, "Weekly page: weeks from now", self.week_offset)?;
        }
        Ok(())
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> AppResult<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(None);
    }
    Ok(Some(answer.trim().to_string()))
}

/// Asks for a whole number of days or weeks. A blank answer keeps `default`.
///
/// # Examples
///
/// ```
/// use bitacora::cli::prompt_offset;
/// use std::io::Cursor;
///
/// let mut output = Vec::new();
/// let offset = prompt_offset(&mut Cursor::new("-1\n"), &mut output, "Days", 0).unwrap();
/// assert_eq!(offset, -1);
/// ```
pub fn prompt_offset<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: i64,
) -> AppResult<i64> {
    let prompt = format!("{} [{}]: ", question, default);
    match ask(input, output, &prompt)? {
        None => Ok(default),
        Some(answer) if answer.is_empty() => Ok(default),
        Some(answer) => answer
            .parse()
            .map_err(|_| AppError::Input(format!("'{}' is not a whole number", answer))),
    }
}

/// Asks a yes/no question, repeating it until the answer is understood.
/// A blank answer or end of input keeps `default`.
pub fn prompt_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: bool,
) -> AppResult<bool> {
    let prompt = if default {
        format!("{} [Y/n] ", question)
    } else {
        format!("{} [y/N] ", question)
    };

    loop {
        let Some(answer) = ask(input, output, &prompt)? else {
            return Ok(default);
        };
        match answer.to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please answer yes or no.")?,
        }
    }
}
