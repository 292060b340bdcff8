use crate::error::{MuxError, Result};

/// Hard ceiling on the number of input streams.
pub const MAX_STREAMS: usize = 256;

/// Default upper bound for one read.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Largest accepted read size (1 MiB).
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Multiplexer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MuxConfig {
    /// Upper bound on the bytes transferred by one read.
    pub chunk_size: usize,
    /// Maximum number of input streams, at most [`MAX_STREAMS`].
    pub max_streams: usize,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_streams: MAX_STREAMS,
        }
    }
}

impl MuxConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_streams(mut self, max_streams: usize) -> Self {
        self.max_streams = max_streams;
        self
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(MuxError::Config(format!(
                "chunk size must be between 1 and {MAX_CHUNK_SIZE} bytes (got {})",
                self.chunk_size
            )));
        }
        if self.max_streams == 0 || self.max_streams > MAX_STREAMS {
            return Err(MuxError::Config(format!(
                "max streams must be between 1 and {MAX_STREAMS} (got {})",
                self.max_streams
            )));
        }
        Ok(())
    }

    /// Reject a designator count above the ceiling.
    pub fn check_stream_count(&self, count: usize) -> Result<()> {
        if count > self.max_streams {
            return Err(MuxError::TooManyStreams {
                count,
                max: self.max_streams,
            });
        }
        Ok(())
    }
}
