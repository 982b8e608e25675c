//! Defines the logging utilities for pwt

use atty::Stream;
use colored::Colorize;
use fern::{Dispatch, FormatCallback, Output};
use log::{Level, LevelFilter, Record, SetLoggerError};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

static DATE_TIME_FORMAT: &[FormatItem] =
    format_description!("[year]/[month]/[day] [hour]:[minute]:[second].[subsecond digits:4]");

/// Provides helpful logging args for clap clis
#[derive(Debug, Default, Clone, clap::Args)]
#[clap(next_help_heading = "Log Level")]
pub struct LoggingArgs {
    /// Only display error level log messages
    #[clap(short, long)]
    #[clap(conflicts_with_all(&["warn", "info", "debug", "trace"]))]
    #[clap(display_order = 1)]
    #[clap(global = true)]
    error: bool,

    /// Display warning and above level log messages
    #[clap(short, long)]
    #[clap(conflicts_with_all(&["error", "info", "debug", "trace"]))]
    #[clap(display_order = 2)]
    #[clap(global = true)]
    warn: bool,

    /// Display info and above level log messages
    #[clap(short, long)]
    #[clap(conflicts_with_all(&["error", "warn", "debug", "trace"]))]
    #[clap(display_order = 3)]
    #[clap(global = true)]
    info: bool,

    /// Display debug and above level log messages
    #[clap(long)]
    #[clap(conflicts_with_all(&["error", "warn", "info", "trace"]))]
    #[clap(display_order = 4)]
    #[clap(global = true)]
    debug: bool,

    /// Display trace and above level log messages
    #[clap(long)]
    #[clap(conflicts_with_all(&["error", "warn", "info", "debug"]))]
    #[clap(display_order = 5)]
    #[clap(global = true)]
    trace: bool,

    /// Show the source of a logging statement
    #[clap(long)]
    #[clap(help_heading = "Logging Settings")]
    #[clap(global = true)]
    pub show_source: bool,

    /// The console output mode.
    #[clap(long, value_enum, default_value_t = ConsoleMode::Auto)]
    #[clap(help_heading = "Logging Settings")]
    #[clap(global = true)]
    pub console: ConsoleMode,
}

/// How output is written to the console
#[derive(Debug, Default, Copy, Clone, clap::ValueEnum, Eq, PartialEq)]
pub enum ConsoleMode {
    /// Rich if stdout is a terminal, plain otherwise
    #[default]
    Auto,
    /// Colored and timestamped output
    Rich,
    /// No colors
    Plain,
}

impl ConsoleMode {
    pub fn resolve(self) -> Self {
        match self {
            ConsoleMode::Auto => {
                if atty::is(Stream::Stdout) {
                    ConsoleMode::Rich
                } else {
                    ConsoleMode::Plain
                }
            }
            other => other,
        }
    }
}

impl LoggingArgs {
    /// Creates logging args that emit everything at `filter` and above
    pub fn with_level(filter: LevelFilter) -> Self {
        let mut args = Self::default();
        match filter {
            LevelFilter::Off | LevelFilter::Error => args.error = true,
            LevelFilter::Warn => args.warn = true,
            LevelFilter::Info => args.info = true,
            LevelFilter::Debug => args.debug = true,
            LevelFilter::Trace => args.trace = true,
        }
        args
    }

    /// Gets the log level
    pub fn log_level_filter(&self) -> LevelFilter {
        if self.error {
            LevelFilter::Error
        } else if self.warn {
            LevelFilter::Warn
        } else if self.info {
            LevelFilter::Info
        } else if self.debug {
            LevelFilter::Debug
        } else if self.trace {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        }
    }

    /// Installs the global logger. Fails if a logger was already installed.
    pub fn init_root_logger(&self) -> Result<(), SetLoggerError> {
        self.create_logger().apply()
    }

    /// Creates the dispatch without installing it
    pub fn create_logger(&self) -> Dispatch {
        let rich = self.console.resolve() == ConsoleMode::Rich;
        if !rich {
            colored::control::set_override(false);
        }
        Self::create_logger_with(self.log_level_filter(), self.show_source, rich, None)
    }

    pub fn create_logger_with(
        filter: LevelFilter,
        show_source: bool,
        rich: bool,
        output: impl Into<Option<Output>>,
    ) -> Dispatch {
        Dispatch::new()
            .level(filter)
            .format(Self::message_format(show_source, rich))
            .chain(output.into().unwrap_or_else(|| Output::stdout("\n")))
    }

    fn message_format(
        show_source: bool,
        rich: bool,
    ) -> impl Fn(FormatCallback, &fmt::Arguments, &Record) + Sync + Send + 'static {
        move |out, message, record| {
            let prefix = Self::format_prefix(record, show_source, rich);
            let message = match record.level() {
                Level::Error => message.to_string().red().to_string(),
                Level::Warn => message.to_string().yellow().to_string(),
                Level::Info | Level::Debug => message.to_string(),
                Level::Trace => message.to_string().bright_blue().to_string(),
            };
            out.finish(format_args!("{} {}", prefix, message))
        }
    }

    fn format_prefix(record: &Record, show_source: bool, rich: bool) -> String {
        let level_string = record.level().to_string().to_lowercase();
        let level_string = match record.level() {
            Level::Error => level_string.red(),
            Level::Warn => level_string.yellow(),
            Level::Info => level_string.green(),
            Level::Debug => level_string.blue(),
            Level::Trace => level_string.bright_black(),
        };
        let mut prefix = if rich {
            let time = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
            let time = time.format(DATE_TIME_FORMAT).unwrap_or_default();
            format!("[{}] {}:", time, level_string)
        } else {
            format!("{}:", level_string)
        };
        if show_source {
            prefix = format!("{} {}", Self::format_source(record), prefix);
        }
        prefix
    }

    fn format_source(record: &Record) -> String {
        match record.module_path().zip(record.file()) {
            Some((module, file)) => {
                let line = record.line().map(|i| format!(":{}", i)).unwrap_or_default();
                let crate_name = module.split("::").next().unwrap_or(module);
                let source: PathBuf = Path::new(file)
                    .iter()
                    .skip_while(|&p| p != OsStr::new("src"))
                    .skip(1)
                    .collect();
                format!(
                    "({crate_name} :: {source}{line})",
                    source = source.to_string_lossy()
                )
                .italic()
                .to_string()
            }
            None => "(<unknown source>)".to_string(),
        }
    }
}
