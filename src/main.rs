/*!
# Bitacora - Printable Planner Pages

Bitacora stamps the day's tasks, logs, stats and journal onto planner templates and
exports them as PDF files.

## Usage

```
bitacora [OPTIONS]

Options:
  -t, --task-offset <DAYS>      Days from today for the task sheet
  -l, --log-offset <DAYS>       Days from today for the log sheet
  -w, --week-offset <WEEKS>     Weeks from the current week for the weekly page
      --weekly                  Also generate the weekly page
  -i, --interactive             Ask for the offsets on the terminal
      --pages <PAGES>           Daily pages to generate [default: tasks,logs,thoughts]
      --no-weather              Leave the forecast strip empty
      --open                    Open the generated PDF files
      --save-recap              Store the recap summary as a note page
      --highlight <TEXT>        Record a highlighted log entry first
  -v, --verbose                 Enable verbose output
```

## Configuration

- `TT_USER` / `TT_PASS`: task service credentials
- `NT_AUTH`: notes service token
- `OPENAI_API_KEY`: needed for recap pages
- `BITACORA_*`: folders, timezone and endpoints
*/

use bitacora::cli::CliArgs;
use bitacora::constants::{TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME};
use bitacora::errors::AppResult;
use bitacora::logging::{self, LogFormat};
use bitacora::app;
use clap::Parser;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

fn main() -> AppResult<()> {
    // Parse command-line arguments
    let args = CliArgs::parse();

    // Initialize logging before anything can fail
    let format: LogFormat = args.log_format.parse()?;
    logging::init(format, args.effective_log_level())?;

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    info!("Starting bitacora");
    debug!("CLI arguments: {:?}", args);

    match app::run(args) {
        Ok(output) => {
            if let Some(path) = &output.daily_pdf {
                info!("{} daily pages written to {}", output.daily_pages, path.display());
            }
            if let Some(path) = &output.weekly_pdf {
                info!("Weekly page written to {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e)
        }
    }
}
