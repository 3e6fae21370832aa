mod app;
mod calendar;
mod classify;
mod config;
mod controller;
mod help;
mod scroll;
mod theme;
use crate::app::App;
use crate::config::{
    parse_color_assignment, parse_highlight, parse_month, ColorRole, PickerConfig, WeekdaySet,
};
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::{style::Color, DefaultTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;
use time::{Month, OffsetDateTime, PrimitiveDateTime};

const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "info"
};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    month: Option<Month>,
    day: Option<u8>,
    highlights: Vec<String>,
    weekdays: Option<WeekdaySet>,
    colors: Vec<(ColorRole, Color)>,
    log_file: Option<PathBuf>,
}

impl RunOptions {
    fn into_config(self, today: PrimitiveDateTime) -> anyhow::Result<PickerConfig> {
        let month = self.month.unwrap_or_else(|| today.month());
        let day = self.day.unwrap_or_else(|| today.day());
        let mut config = PickerConfig::new(month, day)
            .highlighted_days(self.highlights)
            .valid_week_days(self.weekdays.unwrap_or_default());
        for (role, color) in self.colors {
            config = config.color(role, color);
        }
        config.validate(today.year())?;
        Ok(config)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('m') | Arg::Long("month") => {
                    opts.month = Some(parser.value()?.parse_with(parse_month)?);
                }
                Arg::Short('d') | Arg::Long("day") => {
                    opts.day = Some(parser.value()?.parse()?);
                }
                Arg::Long("highlight") => {
                    opts.highlights
                        .push(parser.value()?.parse_with(parse_highlight)?);
                }
                Arg::Short('w') | Arg::Long("weekdays") => {
                    opts.weekdays = Some(parser.value()?.parse()?);
                }
                Arg::Short('c') | Arg::Long("color") => {
                    opts.colors
                        .push(parser.value()?.parse_with(parse_color_assignment)?);
                }
                Arg::Long("log-file") => {
                    opts.log_file = Some(PathBuf::from(parser.value()?));
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                // Read the local offset before anything else can spawn threads
                let now = OffsetDateTime::now_local().context("failed to determine local date")?;
                let today = PrimitiveDateTime::new(now.date(), now.time());
                let _logger = init_logging(opts.log_file.as_deref())?;
                let config = opts.into_config(today)?;
                log::info!(
                    "Starting on {} {} (day {})",
                    config.month,
                    today.year(),
                    config.day
                );
                with_terminal(|terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(&config, today, Instant::now())
                        .run(terminal, now.offset())
                        .context("error while running picker")
                })
            }
            Command::Help => {
                println!("Usage: daypick [<options>]");
                println!();
                println!("Horizontally scrolling terminal day picker");
                println!();
                println!("Options:");
                println!("  -m, --month <MONTH>       Month to show, by name or 0-11 [default: current]");
                println!("  -d, --day <DAY>           Day to centre on [default: today]");
                println!("      --highlight <DATE>    Highlight a YYYY-MM-DD date (repeatable)");
                println!("  -w, --weekdays <LIST>     Comma-separated valid weekdays, 0 = Sunday");
                println!("                            [default: 0,1,2,3,4,5,6]");
                println!("  -c, --color <NAME=COLOR>  Override a colour: today, highlight, future,");
                println!("                            past, default, or text (repeatable)");
                println!("      --log-file <PATH>     Write log messages to the given file");
                println!("  -h, --help                Display this help message and exit");
                println!("  -V, --version             Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

// Nothing is logged unless a log file is given, as the terminal is in use by
// the picker
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<Option<LoggerHandle>> {
    let Some(path) = log_file else {
        return Ok(None);
    };
    let handle = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)
        .context("invalid log specification")?
        .log_to_file(FileSpec::try_from(path).context("invalid log file path")?)
        .start()
        .context("failed to start logger")?;
    Ok(Some(handle))
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(&mut DefaultTerminal) -> anyhow::Result<T>,
{
    let mut terminal = ratatui::init();
    let r = execute!(std::io::stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(&mut terminal));
    // Restore the terminal even if the picker failed
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    r
}
