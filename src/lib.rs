/*!
# Bitacora

Bitacora prints a paper planner. It takes static page templates and stamps them with
the day's tasks, logs, stats, journal reflection and weather before exporting them as
PDF files ready to print.

## Core Features

- Daily task sheet with a colored task board and an hourly forecast strip
- Daily log sheet with the day's logs, stats and a QR code to the journal page
- Stats, journal and language-model recap pages
- Thoughts back page and a weekly page
- Carry-forward of yesterday's sheets so the logs land on the page you already wrote on

## Architecture

- `dates`: page dates from offsets and a timezone-aware "now"
- `services`: blocking clients for the task, notes and weather services
- `ai`: chat completion client and the recap prompt
- `data`: filtering, sorting and formatting of service data
- `render`: layout table, drawing steps and QR codes
- `pages`: one operation per page kind, plus the carry-forward merge
- `export`: PDF and PNG output and opening files
- `app`: the pipeline tying it all together

## Usage Example

```rust,no_run
use bitacora::dates::{now_in, resolve, DateOffsets};
use bitacora::Config;

fn main() -> bitacora::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let offsets = DateOffsets { task_days: 1, ..DateOffsets::default() };
    let dates = resolve(now_in(config.timezone), offsets);
    println!("Printing the task sheet for {}", dates.task_date);
    Ok(())
}
```
*/

/// Chat completion client and prompts
pub mod ai;
/// The page generation pipeline
pub mod app;
/// Command-line interface handling using clap
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Display-ready task, log, stats and journal data
pub mod data;
/// Page date resolution
pub mod dates;
/// Error types and utilities for error handling
pub mod errors;
/// PDF and PNG output
pub mod export;
/// Tracing subscriber setup
pub mod logging;
/// Page assembly and carry-forward pages
pub mod pages;
/// Drawing on page rasters
pub mod render;
/// Task, notes and weather service clients
pub mod services;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
