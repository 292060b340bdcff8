use serde::Serialize;

/// Why a stream was closed.
///
/// Both reasons have the same effect on the merge: the stream is never
/// polled or read again. They differ only in diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CloseReason {
    /// A read returned zero bytes.
    EndOfStream,
    /// A read failed, or the descriptor was reported invalid.
    ReadError { error: String },
}

impl CloseReason {
    pub fn read_error(err: impl ToString) -> Self {
        CloseReason::ReadError {
            error: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CloseReason::ReadError { .. })
    }
}

/// Per-stream totals for one run.
#[derive(Clone, Debug, Serialize)]
pub struct StreamSummary {
    pub index: usize,
    pub origin: String,
    pub bytes: u64,
    pub reads: u64,
    pub closed: Option<CloseReason>,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, Serialize)]
pub struct MuxReport {
    pub streams: Vec<StreamSummary>,
    pub total_bytes: u64,
    pub iterations: u64,
}

impl MuxReport {
    /// Streams that were closed by a read error rather than end of input.
    pub fn failed_streams(&self) -> impl Iterator<Item = &StreamSummary> {
        self.streams
            .iter()
            .filter(|s| s.closed.as_ref().is_some_and(CloseReason::is_error))
    }
}
