use std::io::{ErrorKind, Read};
use std::os::fd::{AsRawFd, RawFd};

use eet_source::Designator;
use tracing::{debug, warn};

use crate::report::{CloseReason, StreamSummary};

/// Lifecycle of one input stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamState {
    Open,
    Closed(CloseReason),
}

/// Result of one bounded read.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ReadOutcome {
    /// `n` bytes are at the front of the buffer.
    Data(usize),
    /// The stream closed during this read.
    Closed,
    /// Spurious readiness; the stream stays open.
    Pending,
}

/// One input stream and its open/closed state.
///
/// The handle is dropped as soon as the stream closes. The stream itself
/// stays in place so indices remain stable.
pub struct Stream<S> {
    index: usize,
    origin: Designator,
    handle: Option<S>,
    state: StreamState,
    bytes: u64,
    reads: u64,
}

impl<S: Read + AsRawFd> Stream<S> {
    pub fn new(index: usize, origin: Designator, handle: S) -> Self {
        Self {
            index,
            origin,
            handle: Some(handle),
            state: StreamState::Open,
            bytes: 0,
            reads: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn origin(&self) -> &Designator {
        &self.origin
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, StreamState::Open)
    }

    /// Descriptor to poll, or `None` once closed.
    pub fn raw_fd(&self) -> Option<RawFd> {
        self.handle.as_ref().map(AsRawFd::as_raw_fd)
    }

    /// Bytes forwarded from this stream so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Read attempts made on this stream so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Transition to `Closed`. Only the first call has any effect.
    pub fn close(&mut self, reason: CloseReason) {
        if !self.is_open() {
            return;
        }

        match &reason {
            CloseReason::EndOfStream => {
                debug!(
                    index = self.index,
                    origin = %self.origin,
                    bytes = self.bytes,
                    "stream ended"
                );
            }
            CloseReason::ReadError { error } => {
                warn!(
                    index = self.index,
                    origin = %self.origin,
                    error = %error,
                    "stream read failed; closing"
                );
            }
        }

        self.handle = None;
        self.state = StreamState::Closed(reason);
    }

    /// Perform one read of up to `buf.len()` bytes.
    pub(crate) fn read_chunk(&mut self, buf: &mut [u8]) -> ReadOutcome {
        let Some(handle) = self.handle.as_mut() else {
            return ReadOutcome::Closed;
        };

        self.reads += 1;
        let result = loop {
            match handle.read(buf) {
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                other => break other,
            }
        };

        match result {
            Ok(0) => {
                self.close(CloseReason::EndOfStream);
                ReadOutcome::Closed
            }
            Ok(n) => {
                self.bytes += n as u64;
                ReadOutcome::Data(n)
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => ReadOutcome::Pending,
            Err(err) => {
                self.close(CloseReason::read_error(err));
                ReadOutcome::Closed
            }
        }
    }

    pub fn summary(&self) -> StreamSummary {
        StreamSummary {
            index: self.index,
            origin: self.origin.to_string(),
            bytes: self.bytes,
            reads: self.reads,
            closed: match &self.state {
                StreamState::Open => None,
                StreamState::Closed(reason) => Some(reason.clone()),
            },
        }
    }
}

impl<S> std::fmt::Debug for Stream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("index", &self.index)
            .field("origin", &self.origin.to_string())
            .field("state", &self.state)
            .field("bytes", &self.bytes)
            .finish()
    }
}
