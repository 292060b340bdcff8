use clap::{Args, ValueEnum};
use tracing::level_filters::LevelFilter;

/// Stderr diagnostics for a merge run. Stdout never carries log lines.
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Log output format (stderr).
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        env = "EET_LOG_FORMAT",
        default_value = "text"
    )]
    pub format: LogFormat,

    /// Minimum log level (stderr). `warn` keeps a clean run silent.
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        env = "EET_LOG_LEVEL",
        default_value = "warn"
    )]
    pub level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    /// One JSON object per event, for supervisors that collect stderr.
    Json,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    /// Adds the end-of-run summary.
    Info,
    /// Adds per-stream open and close events.
    Debug,
    /// Adds every readiness query.
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

pub fn init_logging(args: &LogArgs) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::from(args.level))
        .with_ansi(false)
        .with_target(false);

    let _ = match args.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
