use std::fmt;
use std::io;

use eet_mux::MuxError;
use eet_source::SourceError;

// Exit codes follow sysexits.h where one applies.
pub const SUCCESS: i32 = 0;
pub const POLL_FAILED: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const USAGE: i32 = 64;
pub const NO_INPUT: i32 = 66;
pub const IO_ERROR: i32 = 74;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::BrokenPipe | io::ErrorKind::WriteZero => IO_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn source_error(err: SourceError) -> CliError {
    let code = match err.io_kind() {
        Some(io::ErrorKind::PermissionDenied) => PERMISSION_DENIED,
        Some(_) => NO_INPUT,
        None => USAGE,
    };
    CliError::new(code, err.to_string())
}

pub fn mux_error(err: MuxError) -> CliError {
    match err {
        MuxError::Config(_) | MuxError::TooManyStreams { .. } => {
            CliError::new(USAGE, err.to_string())
        }
        MuxError::Open(err) => source_error(err),
        MuxError::Poll(_) => CliError::new(POLL_FAILED, err.to_string()),
        MuxError::Sink(source) => {
            let mut mapped = io_error("output write failed", source);
            if mapped.code == INTERNAL {
                mapped.code = IO_ERROR;
            }
            mapped
        }
    }
}
