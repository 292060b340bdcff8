use crate::designator::Designator;

/// Errors that can occur while acquiring an input source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The designator could not be opened for reading.
    #[error("can't open stream {designator}: {source}")]
    Open {
        designator: Designator,
        source: std::io::Error,
    },

    /// The designator was an empty string.
    #[error("empty stream designator")]
    Empty,
}

impl SourceError {
    /// The underlying I/O error kind, if any.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            SourceError::Open { source, .. } => Some(source.kind()),
            SourceError::Empty => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
