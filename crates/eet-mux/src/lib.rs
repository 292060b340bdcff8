//! Readiness-driven merging of independent byte streams.
//!
//! The [`Multiplexer`] owns a fixed, ordered set of input streams. Each
//! iteration it blocks in `poll(2)` until at least one open stream is
//! readable, then performs one bounded read per ready stream and forwards
//! the bytes to a single sink:
//! - bytes of one stream keep their order
//! - streams interleave in whatever order readiness is reported
//! - a stream that reaches end of input (or fails) is closed for good
//!
//! The loop ends when every stream is closed.

pub mod config;
pub mod error;
pub mod report;

#[cfg(unix)]
pub mod multiplexer;
#[cfg(unix)]
pub mod poll;
#[cfg(unix)]
pub mod sink;
#[cfg(unix)]
pub mod stream;

pub use config::{MuxConfig, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, MAX_STREAMS};
pub use error::{MuxError, Result};
pub use report::{CloseReason, MuxReport, StreamSummary};

#[cfg(unix)]
pub use multiplexer::Multiplexer;
#[cfg(unix)]
pub use sink::ChunkSink;
#[cfg(unix)]
pub use stream::{Stream, StreamState};
