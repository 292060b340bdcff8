use eet_source::SourceError;

/// Errors that end a multiplexer run.
///
/// Per-stream read failures are not errors at this level: they close the
/// affected stream and the run continues.
#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    /// The configuration is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// More designators than the configured ceiling.
    #[error("too many input streams ({count}, max {max})")]
    TooManyStreams { count: usize, max: usize },

    /// A designator could not be opened.
    #[error(transparent)]
    Open(#[from] SourceError),

    /// The readiness query itself failed.
    #[error("readiness query failed: {0}")]
    Poll(std::io::Error),

    /// Writing merged bytes to the sink failed.
    #[error("output write failed: {0}")]
    Sink(std::io::Error),
}

pub type Result<T> = std::result::Result<T, MuxError>;
